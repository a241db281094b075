//! Conversions between wire messages and primitive types.

use bytes::Bytes;
use tool_primitives as primitives;

use crate::error::{WireError, WireResult};
use crate::messages::{
    ExecuteResponse, FieldDescriptor, Image, StructuredResult, ToolError, ToolSchema,
    execute_response::Outcome,
    structured_result::{Content, Metadata},
};
use crate::payload::{PayloadEncoding, parse_object};

impl From<&primitives::ToolError> for ToolError {
    fn from(error: &primitives::ToolError) -> Self {
        Self {
            kind: error.kind().as_str().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

impl ToolError {
    /// Converts the wire error back into the primitive taxonomy.
    ///
    /// Kinds this build does not recognise are reported as `internal_error`
    /// with the original kind preserved in the message.
    #[must_use]
    pub fn into_primitive(self) -> primitives::ToolError {
        match self.kind.parse::<primitives::ToolErrorKind>() {
            Ok(kind) => primitives::ToolError::new(kind, self.message),
            Err(_) => primitives::ToolError::internal(format!(
                "unrecognised error kind `{}`: {}",
                self.kind, self.message
            )),
        }
    }
}

/// Flattens a result into its wire message.
///
/// Content and metadata are carried in the branches matching `encoding`, so a
/// response always mirrors the encoding of the request that produced it.
///
/// # Errors
///
/// Returns [`WireError::InvalidJson`] if the metadata cannot be serialised.
pub fn encode_result(
    result: &primitives::StructuredResult,
    encoding: PayloadEncoding,
) -> WireResult<StructuredResult> {
    let metadata = result
        .metadata()
        .map(serde_json::to_string)
        .transpose()?
        .map(|json| match encoding {
            PayloadEncoding::Text => Metadata::MetadataText(json),
            PayloadEncoding::Binary => Metadata::MetadataBinary(Bytes::from(json)),
        });

    let content = match encoding {
        PayloadEncoding::Text => Content::ContentText(result.content().to_owned()),
        PayloadEncoding::Binary => {
            Content::ContentBinary(Bytes::copy_from_slice(result.content().as_bytes()))
        }
    };

    Ok(StructuredResult {
        variable_name: result.variable_name().to_owned(),
        content: Some(content),
        local_file_path: result.local_file_path().map(str::to_owned),
        metadata,
        memory_push: result.memory_push(),
        images: result
            .images()
            .unwrap_or_default()
            .iter()
            .map(|image| Image {
                mime_type: image.mime_type().to_owned(),
                data: image.base64_data().to_owned(),
            })
            .collect(),
        error: result.error().map(str::to_owned),
    })
}

/// Rebuilds a result from its wire message.
///
/// # Errors
///
/// Returns a [`WireError`] if binary content is not UTF-8 or the metadata is
/// not a JSON object.
pub fn decode_result(message: StructuredResult) -> WireResult<primitives::StructuredResult> {
    let StructuredResult {
        variable_name,
        content,
        local_file_path,
        metadata,
        memory_push,
        images,
        error,
    } = message;

    let content = match content {
        None => String::new(),
        Some(Content::ContentText(text)) => text,
        Some(Content::ContentBinary(bytes)) => std::str::from_utf8(&bytes)?.to_owned(),
    };
    let mut result =
        primitives::StructuredResult::new(variable_name, content).with_memory_push(memory_push);
    if let Some(path) = local_file_path {
        result = result.with_local_file_path(path);
    }
    if let Some(metadata) = metadata {
        let map = match metadata {
            Metadata::MetadataText(text) => parse_object(&text)?,
            Metadata::MetadataBinary(bytes) => parse_object(std::str::from_utf8(&bytes)?)?,
        };
        result = result.with_metadata(map);
    }
    if !images.is_empty() {
        result = result.with_images(
            images
                .into_iter()
                .map(|image| primitives::ImageContent::new(image.mime_type, image.data))
                .collect(),
        );
    }
    if let Some(error) = error {
        result = result.with_error(error);
    }
    Ok(result)
}

/// Returns which encoding the response content was carried in.
///
/// `None` only for messages that carry no content branch at all, which
/// [`encode_result`] never produces.
#[must_use]
pub fn result_encoding(message: &StructuredResult) -> Option<PayloadEncoding> {
    message.content.as_ref().map(|content| match content {
        Content::ContentText(_) => PayloadEncoding::Text,
        Content::ContentBinary(_) => PayloadEncoding::Binary,
    })
}

impl ExecuteResponse {
    /// Wraps a successful result.
    #[must_use]
    pub fn success(result: StructuredResult) -> Self {
        Self {
            result: Some(Outcome::StructuredResult(result)),
        }
    }

    /// Wraps a tool failure.
    #[must_use]
    pub fn failure(error: &primitives::ToolError) -> Self {
        Self {
            result: Some(Outcome::Error(error.into())),
        }
    }

    /// Unpacks the response into a result or a tool error.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MissingOutcome`] when neither branch is set, or a
    /// decoding error for malformed result metadata.
    pub fn into_outcome(
        self,
    ) -> WireResult<Result<primitives::StructuredResult, primitives::ToolError>> {
        match self.result.ok_or(WireError::MissingOutcome)? {
            Outcome::StructuredResult(result) => decode_result(result).map(Ok),
            Outcome::Error(error) => Ok(Err(error.into_primitive())),
        }
    }
}

impl From<&primitives::ToolSchema> for ToolSchema {
    fn from(schema: &primitives::ToolSchema) -> Self {
        Self {
            tool_name: schema.tool_name().to_owned(),
            fields: schema
                .fields()
                .iter()
                .map(|field| FieldDescriptor {
                    name: field.name().to_owned(),
                    type_tag: field.type_tag().as_str().to_owned(),
                    required: field.required(),
                    description: field.description().to_owned(),
                })
                .collect(),
            description: schema.description().to_owned(),
        }
    }
}

impl TryFrom<ToolSchema> for primitives::ToolSchema {
    type Error = WireError;

    fn try_from(schema: ToolSchema) -> WireResult<Self> {
        let fields = schema
            .fields
            .into_iter()
            .map(|field| {
                let type_tag = field.type_tag.parse::<primitives::TypeTag>()?;
                Ok(
                    primitives::FieldDescriptor::new(field.name, type_tag, field.required)
                        .with_description(field.description),
                )
            })
            .collect::<WireResult<Vec<_>>>()?;

        Ok(Self::new(schema.tool_name)
            .with_description(schema.description)
            .with_fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> primitives::StructuredResult {
        primitives::StructuredResult::new("report", "done")
            .with_metadata(json!({"pages": 3}).as_object().cloned().unwrap())
            .with_images(vec![primitives::ImageContent::new("image/png", "aGk=")])
            .with_local_file_path("/tmp/report.txt")
    }

    #[test]
    fn metadata_branch_mirrors_request_encoding() {
        let text = encode_result(&sample(), PayloadEncoding::Text).unwrap();
        assert_eq!(result_encoding(&text), Some(PayloadEncoding::Text));

        let binary = encode_result(&sample(), PayloadEncoding::Binary).unwrap();
        assert_eq!(result_encoding(&binary), Some(PayloadEncoding::Binary));

        assert!(matches!(binary.metadata, Some(Metadata::MetadataBinary(_))));
        assert_eq!(decode_result(binary).unwrap(), sample());
    }

    #[test]
    fn bare_content_still_mirrors_request_encoding() {
        let bare = primitives::StructuredResult::new("identity_result", r#"{"x":1}"#);

        let text = encode_result(&bare, PayloadEncoding::Text).unwrap();
        assert_eq!(result_encoding(&text), Some(PayloadEncoding::Text));

        let binary = encode_result(&bare, PayloadEncoding::Binary).unwrap();
        assert_eq!(result_encoding(&binary), Some(PayloadEncoding::Binary));
        assert_ne!(text, binary);

        assert_eq!(decode_result(binary).unwrap(), bare);
    }

    #[test]
    fn non_utf8_binary_content_is_rejected() {
        let message = StructuredResult {
            variable_name: "broken".into(),
            content: Some(Content::ContentBinary(Bytes::from_static(&[0xff, 0xfe]))),
            ..StructuredResult::default()
        };
        assert!(decode_result(message).is_err());
    }

    #[test]
    fn unknown_error_kinds_degrade_to_internal() {
        let error = ToolError {
            kind: "quota_exceeded".into(),
            message: "slow down".into(),
        }
        .into_primitive();

        assert_eq!(error.kind(), primitives::ToolErrorKind::InternalError);
        assert!(error.message().contains("quota_exceeded"));
    }

    #[test]
    fn response_without_outcome_is_rejected() {
        let err = ExecuteResponse::default().into_outcome().unwrap_err();
        assert!(matches!(err, WireError::MissingOutcome));
    }

    #[test]
    fn schema_with_unknown_tag_is_rejected() {
        let schema = ToolSchema {
            tool_name: "legacy".into(),
            fields: vec![FieldDescriptor {
                name: "items".into(),
                type_tag: "repeated bytes".into(),
                required: true,
                description: String::new(),
            }],
            description: String::new(),
        };

        let err = primitives::ToolSchema::try_from(schema).unwrap_err();
        assert!(matches!(err, WireError::Primitive(_)));
    }
}

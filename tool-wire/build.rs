use tonic_build::manual::{Builder, Method, Service};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let service = Service::builder()
        .name("ToolService")
        .package("toolhost.tools")
        .comment("Executes hosted tools and describes their inputs.")
        .method(
            Method::builder()
                .name("execute")
                .route_name("Execute")
                .input_type("crate::messages::ExecuteRequest")
                .output_type("crate::messages::ExecuteResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .method(
            Method::builder()
                .name("get_tool_schema")
                .route_name("GetToolSchema")
                .input_type("crate::messages::GetToolSchemaRequest")
                .output_type("crate::messages::ToolSchema")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    Builder::new().compile(&[service]);
}

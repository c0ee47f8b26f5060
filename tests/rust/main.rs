mod bridge_tests;
mod pipeline_compiler_tests;
mod result_mapper_tests;

pub mod dataverse_stub;
pub mod test_env;

// Re-export key testing utilities
pub use dataverse_stub::{DataverseStub, StubComponent};
pub use test_env::{ConditionalRule, HermeticSessionBuilder, MockBehavior, TestEnvironment};

// Unit tests live next to the code they cover; this module wires in the
// tests that run the HTTP client against a local mock backend.

#[path = "tests/common/mock_backend.rs"]
mod mock_backend;

// Include client tests
#[path = "client_test.rs"]
mod client_tests;

// Include integration tests
#[path = "integration_tests.rs"]
mod integration_tests;

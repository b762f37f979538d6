mod mock_transport;
mod session_tests;

//! Configuration resolved through the process environment.
//!
//! Kept in its own test binary as a single test: the environment is process
//! global and other tests would race with these mutations.

use pretty_assertions::assert_eq;
use sum_service::config::Config;

#[test]
fn port_and_host_resolve_from_process_environment() {
    std::env::remove_var("SUM_SERVICE_HOST");

    std::env::set_var("PORT", "9001");
    let config = Config::load().unwrap();
    assert_eq!(config.port, 9001);
    assert_eq!(config.bind_addr().port(), 9001);
    assert_eq!(Config::ignored_port_value(), None);

    std::env::set_var("PORT", "not-a-port");
    let config = Config::load().unwrap();
    assert_eq!(config.port, 8000);
    assert_eq!(Config::ignored_port_value().as_deref(), Some("not-a-port"));

    std::env::remove_var("PORT");
    let config = Config::load().unwrap();
    assert_eq!(config.port, 8000);
    assert_eq!(Config::ignored_port_value(), None);

    std::env::set_var("HOST", "myhost");
    std::env::set_var("SUM_SERVICE_HOST", "also-not-an-ip");
    let config = Config::load().unwrap();
    assert!(config.validate().is_ok());
    assert!(config.bind_addr().ip().is_unspecified());
    assert_eq!(Config::ignored_host_value().as_deref(), Some("also-not-an-ip"));

    std::env::remove_var("HOST");
    std::env::remove_var("SUM_SERVICE_HOST");
}

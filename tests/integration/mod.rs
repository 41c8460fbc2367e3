// Integration test modules
pub mod completion_tests;
pub mod evaluation_tests;
pub mod property_tests;
pub mod session_tests;
pub mod validation_tests;

/// Shared fixtures
pub mod fixtures {
    use serde_json::{json, Value};

    pub const EXAMPLE_QUERY: &str = "os CONTAINS \"Windows\" AND risk_level = \"HIGH\"";

    /// A small device inventory as the dashboard would hold it
    pub fn devices() -> Vec<Value> {
        vec![
            json!({
                "hostname": "ws-finance-01",
                "os": "Windows 11 Pro",
                "ip": "10.1.4.20",
                "risk_level": "HIGH",
                "status": "online",
                "device_type": "workstation",
                "open_ports": 12,
                "vulnerabilities": 7,
                "last_activity": "2024-06-01T09:30:00Z",
                "user": "alice",
                "department": "Finance"
            }),
            json!({
                "hostname": "srv-db-02",
                "os": "Ubuntu 22.04",
                "ip": "10.2.0.8",
                "risk_level": "CRITICAL",
                "status": "isolated",
                "device_type": "server",
                "open_ports": 31,
                "vulnerabilities": 14,
                "last_activity": "2024-05-10T00:00:00Z",
                "user": "svc-backup",
                "department": "Engineering"
            }),
            json!({
                "hostname": "lt-eng-07",
                "os": "Windows 10 Enterprise",
                "ip": "192.168.10.77",
                "risk_level": "LOW",
                "status": "offline",
                "device_type": "laptop",
                "open_ports": 3,
                "vulnerabilities": 0,
                "last_activity": "2024-06-01T11:45:00Z",
                "user": "bob",
                "department": "Engineering"
            }),
            json!({
                "hostname": "cam-lobby",
                "ip": "172.16.0.4",
                "risk_level": "MEDIUM",
                "status": "online",
                "device_type": "iot"
            }),
        ]
    }
}

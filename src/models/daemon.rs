use serde::Deserialize;

/// One node as reported by the daemon's `/nodes.json`. The daemon attaches
/// more fields than these; they are ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct DaemonNode {
    pub name: String,
    #[serde(default)]
    pub ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerates_unknown_fields() {
        let raw = r#"[
            {"name": "r1", "ip": "10.0.0.2", "model": "junos", "last": {"status": "success"}},
            {"name": "r2"}
        ]"#;
        let nodes = serde_json::from_str::<Vec<DaemonNode>>(raw).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(nodes[1].ip, None);
    }
}

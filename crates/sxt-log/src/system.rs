//! Host properties recorded at the start of every run log.

use std::env;

/// Source of `(name, value)` pairs describing the host a run executes on.
pub trait SystemMetadata {
    fn properties(&self) -> Vec<(String, String)>;
}

/// Reads properties from the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMetadata;

impl SystemMetadata for ProcessMetadata {
    fn properties(&self) -> Vec<(String, String)> {
        let mut properties = vec![
            ("os.name".to_string(), env::consts::OS.to_string()),
            ("os.arch".to_string(), env::consts::ARCH.to_string()),
            ("os.family".to_string(), env::consts::FAMILY.to_string()),
            (
                "sxt.version".to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            ),
        ];
        if let Ok(dir) = env::current_dir() {
            properties.push(("user.dir".to_string(), dir.display().to_string()));
        }
        if let Ok(exe) = env::current_exe() {
            properties.push(("process.executable".to_string(), exe.display().to_string()));
        }
        properties
    }
}

/// Fixed properties, for reproducible logs.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata(Vec<(String, String)>);

impl StaticMetadata {
    pub fn new<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl SystemMetadata for StaticMetadata {
    fn properties(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

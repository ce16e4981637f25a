//! Host platform identification.

use std::fmt;

/// Operating system family the pipeline adapts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Windows,
    Darwin,
    Linux,
    Other,
}

impl PlatformFamily {
    /// Map an OS identifier (`std::env::consts::OS` style, or `darwin`).
    pub fn from_os(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "windows" => PlatformFamily::Windows,
            "darwin" | "macos" => PlatformFamily::Darwin,
            "linux" => PlatformFamily::Linux,
            _ => PlatformFamily::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFamily::Windows => "windows",
            PlatformFamily::Darwin => "darwin",
            PlatformFamily::Linux => "linux",
            PlatformFamily::Other => "other",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, PlatformFamily::Windows)
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of the host, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub family: PlatformFamily,
    /// Go-style architecture name (`amd64`, `arm64`, ...)
    pub architecture: String,
    /// `.exe` on Windows, empty elsewhere
    pub executable_extension: &'static str,
}

impl PlatformDescriptor {
    /// Describe the host this process runs on.
    pub fn describe() -> Self {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Describe a host from its OS and CPU identifiers.
    ///
    /// Windows and Linux are always treated as `amd64`: those are the only
    /// architectures the release binaries are built for.
    pub fn from_host(os: &str, machine: &str) -> Self {
        let family = PlatformFamily::from_os(os);
        let machine = machine.to_lowercase();

        let architecture = match family {
            PlatformFamily::Windows | PlatformFamily::Linux => "amd64".to_string(),
            PlatformFamily::Darwin => {
                if is_arm(&machine) {
                    "arm64".to_string()
                } else {
                    "amd64".to_string()
                }
            }
            PlatformFamily::Other if machine.is_empty() => "amd64".to_string(),
            PlatformFamily::Other => machine,
        };

        let executable_extension = if family.is_windows() { ".exe" } else { "" };

        PlatformDescriptor {
            family,
            architecture,
            executable_extension,
        }
    }

    /// Append the platform's executable extension to `name`.
    pub fn executable_name(&self, name: &str) -> String {
        format!("{}{}", name, self.executable_extension)
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.architecture)
    }
}

fn is_arm(machine: &str) -> bool {
    machine.contains("arm") || machine.contains("aarch64")
}

//! Listing Parser
//!
//! Turns the SDK manager's human-readable `list target` and `list avd`
//! output into records. The format is loose text with header and footer
//! boilerplate, so parsing is tolerant: blocks that do not carry every
//! field are dropped rather than reported.

/// Separates target blocks in `list target` output
pub const TARGET_SEPARATOR: &str = "----------";

/// Separates device blocks in `list avd` output
pub const AVD_SEPARATOR: &str = "---------";

/// Introductory line of `list avd` output
pub const AVD_HEADER: &str = "Available Android Virtual Devices:";

/// A platform version the toolchain can compile against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Every alias accepted for this target (`17`, `android-17`, ...)
    pub identifiers: Vec<String>,
    pub name: String,
    pub device_type: String,
    pub api_level: String,
    pub revision: String,
    pub skins: Vec<String>,
}

impl Target {
    /// Whether `requested` is one of this target's aliases
    pub fn matches(&self, requested: &str) -> bool {
        self.identifiers.iter().any(|id| id == requested)
    }

    /// Directory name under `<sdk>/platforms` holding the platform jar.
    ///
    /// Prefers the `android-*` alias; falls back to `requested`.
    pub fn platform_id<'a>(&'a self, requested: &'a str) -> &'a str {
        self.identifiers
            .iter()
            .find(|id| id.starts_with("android-"))
            .map(String::as_str)
            .unwrap_or(requested)
    }
}

#[derive(Default)]
struct TargetBuilder {
    identifiers: Vec<String>,
    name: Option<String>,
    device_type: Option<String>,
    api_level: Option<String>,
    revision: Option<String>,
    skins: Vec<String>,
}

impl TargetBuilder {
    fn field(&mut self, key: &str, value: &str) {
        match key {
            "id" => {
                for alternative in value.split(" or ") {
                    self.identifiers.push(unquote(alternative).to_string());
                }
            }
            "Name" => self.name = Some(value.trim().to_string()),
            "Type" => self.device_type = Some(value.trim().to_string()),
            "API level" => self.api_level = Some(value.trim().to_string()),
            "Revision" => self.revision = Some(value.trim().to_string()),
            "Skins" => {
                self.skins
                    .extend(value.split(',').map(|s| s.trim().to_string()));
            }
            _ => {}
        }
    }

    fn build(self) -> Option<Target> {
        if self.identifiers.is_empty() || self.skins.is_empty() {
            return None;
        }
        Some(Target {
            identifiers: self.identifiers,
            name: self.name?,
            device_type: self.device_type?,
            api_level: self.api_level?,
            revision: self.revision?,
            skins: self.skins,
        })
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(value)
}

/// Parse `list target` output. Only fully populated blocks are returned.
pub fn parse_targets(raw: &str) -> Vec<Target> {
    raw.split(TARGET_SEPARATOR)
        .filter_map(|block| {
            let mut builder = TargetBuilder::default();
            for line in block.lines() {
                if let Some((key, value)) = line.trim().split_once(':') {
                    builder.field(key, value);
                }
            }
            builder.build()
        })
        .collect()
}

/// First target accepting `requested` as an alias
pub fn find_target<'a>(targets: &'a [Target], requested: &str) -> Option<&'a Target> {
    targets.iter().find(|t| t.matches(requested))
}

/// Parse `list avd` output into virtual device names
pub fn parse_virtual_devices(raw: &str) -> Vec<String> {
    raw.split(AVD_SEPARATOR)
        .flat_map(|block| block.lines())
        .filter(|line| line.trim() != AVD_HEADER)
        .filter(|line| line.contains("Name:"))
        .filter_map(|line| line.rsplit(':').next())
        .map(|name| name.trim().to_string())
        .collect()
}

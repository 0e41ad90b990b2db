// src/rules/tfm.rs

//! Target framework monikers
//!
//! Legacy projects name their framework with `TargetFrameworkVersion`
//! (`v4.7.2`); SDK-style projects use a moniker (`net472`, `netstandard2.0`,
//! `net8.0-windows`). Several rules need to know which family a moniker is in
//! and how new it is.

use std::fmt;

/// A dotted framework version, missing parts are zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameworkVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FrameworkVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse `4.7.2` style versions
    fn parse_dotted(s: &str) -> Option<Self> {
        let mut parts = s.split('.').map(|p| p.parse::<u32>());
        let major = parts.next()?.ok()?;
        let minor = parts.next().transpose().ok()?.unwrap_or(0);
        let patch = parts.next().transpose().ok()?.unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }

    /// Parse the compact .NET Framework form: `472` -> 4.7.2, `48` -> 4.8
    fn parse_compact(s: &str) -> Option<Self> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let digit = |i: usize| s[i..i + 1].parse::<u32>().ok();
        Some(Self::new(
            digit(0)?,
            if s.len() > 1 { digit(1)? } else { 0 },
            if s.len() > 2 { digit(2)? } else { 0 },
        ))
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

/// Framework family of a moniker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFramework {
    /// `net472`, `v4.8`
    NetFramework(FrameworkVersion),
    /// `netcoreapp3.1`
    NetCoreApp(FrameworkVersion),
    /// `netstandard2.0`
    NetStandard(FrameworkVersion),
    /// `net5.0` and later, with or without a platform suffix
    Net(FrameworkVersion),
}

impl TargetFramework {
    /// Parse a moniker or a legacy `vX.Y` version
    pub fn parse(moniker: &str) -> Option<Self> {
        let moniker = moniker.trim().to_ascii_lowercase();
        let base = moniker.split('-').next().unwrap_or(&moniker);

        if let Some(version) = base.strip_prefix('v') {
            return FrameworkVersion::parse_dotted(version).map(Self::NetFramework);
        }
        if let Some(version) = base.strip_prefix("netcoreapp") {
            return FrameworkVersion::parse_dotted(version).map(Self::NetCoreApp);
        }
        if let Some(version) = base.strip_prefix("netstandard") {
            return FrameworkVersion::parse_dotted(version).map(Self::NetStandard);
        }
        let version = base.strip_prefix("net")?;
        if version.contains('.') {
            let parsed = FrameworkVersion::parse_dotted(version)?;
            return Some(if parsed.major >= 5 {
                Self::Net(parsed)
            } else {
                Self::NetFramework(parsed)
            });
        }
        FrameworkVersion::parse_compact(version).map(Self::NetFramework)
    }

    pub fn is_net_framework(&self) -> bool {
        matches!(self, Self::NetFramework(_))
    }

    /// .NET Core, .NET 5+ and friends
    pub fn is_core(&self) -> bool {
        matches!(self, Self::NetCoreApp(_) | Self::Net(_))
    }

    /// Whether this is .NET Framework at or above `minimum`
    pub fn is_net_framework_at_least(&self, minimum: FrameworkVersion) -> bool {
        matches!(self, Self::NetFramework(v) if *v >= minimum)
    }

    pub fn is_net_standard_at_least(&self, minimum: FrameworkVersion) -> bool {
        matches!(self, Self::NetStandard(v) if *v >= minimum)
    }

    pub fn is_core_at_least(&self, netcoreapp: FrameworkVersion) -> bool {
        match self {
            Self::NetCoreApp(v) => *v >= netcoreapp,
            Self::Net(_) => true,
            _ => false,
        }
    }
}

/// Monikers in the dotted style are kept verbatim when converting
pub fn is_forward_compatible(moniker: &str) -> bool {
    matches!(
        TargetFramework::parse(moniker),
        Some(TargetFramework::NetCoreApp(_) | TargetFramework::NetStandard(_) | TargetFramework::Net(_))
    )
}

/// `net4.7.2` -> `net472`
pub fn strip_decimals(moniker: &str) -> String {
    moniker.chars().filter(|c| *c != '.').collect()
}

/// Moniker for a legacy `TargetFrameworkVersion`: `v4.7.2` -> `net472`
pub fn moniker_from_framework_version(version: &str) -> Option<String> {
    let parsed = FrameworkVersion::parse_dotted(version.trim().trim_start_matches(['v', 'V']))?;
    let mut moniker = format!("net{}{}", parsed.major, parsed.minor);
    if parsed.patch != 0 {
        moniker.push_str(&parsed.patch.to_string());
    }
    Some(moniker)
}

/// Final moniker written to the converted project
pub fn normalize_moniker(moniker: &str) -> String {
    if is_forward_compatible(moniker) {
        moniker.to_string()
    } else if let Some(rest) = moniker.strip_prefix(['v', 'V']) {
        moniker_from_framework_version(rest).unwrap_or_else(|| strip_decimals(moniker))
    } else {
        strip_decimals(moniker)
    }
}

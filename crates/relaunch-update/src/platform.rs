//! Platform detection and artifact naming
//!
//! The host is described by [`HostFacts`] and mapped to a [`PlatformTag`] by
//! walking [`PLATFORM_RULES`] top to bottom. ARM rules sit above the generic
//! bitness rules of the same OS family so that, for example, 64-bit ARM
//! Windows resolves to `win-arm64` rather than `win-x64`.

use crate::error::{Error, Result};
use crate::version::SemVer;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl OsFamily {
    /// Map a `std::env::consts::OS` value
    pub fn from_consts(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuArch {
    X64,
    X86,
    Arm,
    Arm64,
    Other,
}

impl CpuArch {
    /// Map a `std::env::consts::ARCH` value
    pub fn from_consts(arch: &str) -> Self {
        match arch {
            "x86_64" => Self::X64,
            "x86" => Self::X86,
            "arm" => Self::Arm,
            "aarch64" => Self::Arm64,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for CpuArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X64 => write!(f, "x64"),
            Self::X86 => write!(f, "x86"),
            Self::Arm => write!(f, "arm"),
            Self::Arm64 => write!(f, "arm64"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Facts about the running host, computed once and passed in explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostFacts {
    pub os: OsFamily,
    pub is_64bit: bool,
    pub arch: CpuArch,
}

impl HostFacts {
    /// Facts for the platform this binary was compiled for
    pub fn current() -> Self {
        Self {
            os: OsFamily::from_consts(std::env::consts::OS),
            is_64bit: cfg!(target_pointer_width = "64"),
            arch: CpuArch::from_consts(std::env::consts::ARCH),
        }
    }
}

/// Canonical platform tag used in artifact names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlatformTag {
    #[serde(rename = "win-x64")]
    WinX64,
    #[serde(rename = "win-x86")]
    WinX86,
    #[serde(rename = "win-arm")]
    WinArm,
    #[serde(rename = "win-arm64")]
    WinArm64,
    #[serde(rename = "linux-x64")]
    LinuxX64,
    #[serde(rename = "linux-arm")]
    LinuxArm,
    #[serde(rename = "linux-arm64")]
    LinuxArm64,
    #[serde(rename = "osx-x64")]
    OsxX64,
    #[serde(rename = "osx-arm64")]
    OsxArm64,
    #[serde(rename = "unsupported")]
    Unsupported,
}

impl PlatformTag {
    /// Every tag, `Unsupported` last
    pub const ALL: [PlatformTag; 10] = [
        Self::WinX64,
        Self::WinX86,
        Self::WinArm,
        Self::WinArm64,
        Self::LinuxX64,
        Self::LinuxArm,
        Self::LinuxArm64,
        Self::OsxX64,
        Self::OsxArm64,
        Self::Unsupported,
    ];

    /// Tag as it appears in artifact names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WinX64 => "win-x64",
            Self::WinX86 => "win-x86",
            Self::WinArm => "win-arm",
            Self::WinArm64 => "win-arm64",
            Self::LinuxX64 => "linux-x64",
            Self::LinuxArm => "linux-arm",
            Self::LinuxArm64 => "linux-arm64",
            Self::OsxX64 => "osx-x64",
            Self::OsxArm64 => "osx-arm64",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether this is a Windows tag
    pub fn is_windows(&self) -> bool {
        matches!(
            self,
            Self::WinX64 | Self::WinX86 | Self::WinArm | Self::WinArm64
        )
    }

    /// Whether automatic updating is possible on this platform
    pub fn is_supported(&self) -> bool {
        *self != Self::Unsupported
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitness constraint of a platform rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitness {
    Any,
    Bits64,
    Bits32,
}

impl Bitness {
    fn matches(&self, is_64bit: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Bits64 => is_64bit,
            Self::Bits32 => !is_64bit,
        }
    }
}

/// One row of the platform table
#[derive(Debug, Clone, Copy)]
pub struct PlatformRule {
    pub os: OsFamily,
    pub arches: &'static [CpuArch],
    pub bitness: Bitness,
    pub tag: PlatformTag,
}

impl PlatformRule {
    fn matches(&self, facts: &HostFacts) -> bool {
        self.os == facts.os
            && self.arches.contains(&facts.arch)
            && self.bitness.matches(facts.is_64bit)
    }
}

const fn rule(
    os: OsFamily,
    arches: &'static [CpuArch],
    bitness: Bitness,
    tag: PlatformTag,
) -> PlatformRule {
    PlatformRule {
        os,
        arches,
        bitness,
        tag,
    }
}

const INTEL: &[CpuArch] = &[CpuArch::X64, CpuArch::X86];

/// Platform rules, evaluated top to bottom; first match wins
pub const PLATFORM_RULES: &[PlatformRule] = &[
    // ARM before bitness
    rule(OsFamily::Windows, &[CpuArch::Arm64], Bitness::Any, PlatformTag::WinArm64),
    rule(OsFamily::Windows, &[CpuArch::Arm], Bitness::Any, PlatformTag::WinArm),
    rule(OsFamily::Linux, &[CpuArch::Arm64], Bitness::Any, PlatformTag::LinuxArm64),
    rule(OsFamily::Linux, &[CpuArch::Arm], Bitness::Any, PlatformTag::LinuxArm),
    rule(OsFamily::MacOs, &[CpuArch::Arm64], Bitness::Any, PlatformTag::OsxArm64),
    // Generic bitness
    rule(OsFamily::Windows, INTEL, Bitness::Bits64, PlatformTag::WinX64),
    rule(OsFamily::Windows, INTEL, Bitness::Bits32, PlatformTag::WinX86),
    rule(OsFamily::Linux, &[CpuArch::X64], Bitness::Bits64, PlatformTag::LinuxX64),
    rule(OsFamily::MacOs, &[CpuArch::X64], Bitness::Bits64, PlatformTag::OsxX64),
];

/// Resolve the platform tag for `facts`
pub fn detect(facts: &HostFacts) -> PlatformTag {
    let tag = PLATFORM_RULES
        .iter()
        .find(|r| r.matches(facts))
        .map(|r| r.tag)
        .unwrap_or(PlatformTag::Unsupported);

    debug!(
        "Detected platform: {}/{} ({}-bit) -> {}",
        facts.os,
        facts.arch,
        if facts.is_64bit { 64 } else { 32 },
        tag
    );

    tag
}

/// Resolve the platform tag, refusing unsupported hosts
pub fn require_supported(facts: &HostFacts) -> Result<PlatformTag> {
    match detect(facts) {
        PlatformTag::Unsupported => Err(Error::unsupported_platform(
            facts.os.to_string(),
            facts.arch.to_string(),
        )),
        tag => Ok(tag),
    }
}

/// File extension of executables for `tag`
pub fn artifact_extension(tag: PlatformTag) -> &'static str {
    if tag.is_windows() {
        ".exe"
    } else {
        ""
    }
}

/// Downloadable artifact name: `{app}_{platform}-{version}{ext}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Compose the artifact name
    pub fn new(app_name: &str, tag: PlatformTag, version: &SemVer) -> Self {
        Self(format!(
            "{}_{}-{}{}",
            app_name,
            tag,
            version,
            artifact_extension(tag)
        ))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Shared constants for test infrastructure

use relaunch_update::platform::{CpuArch, HostFacts, OsFamily};

pub const APP_NAME: &str = "Updatr";

pub const VERSION_1_0_7: &str = "1.0.7";
pub const VERSION_1_0_8: &str = "1.0.8";
pub const VERSION_2_0_0: &str = "2.0.0";

pub const LINUX_X64_HOST: HostFacts = HostFacts {
    os: OsFamily::Linux,
    is_64bit: true,
    arch: CpuArch::X64,
};

pub const WINDOWS_X64_HOST: HostFacts = HostFacts {
    os: OsFamily::Windows,
    is_64bit: true,
    arch: CpuArch::X64,
};

pub const UNSUPPORTED_HOST: HostFacts = HostFacts {
    os: OsFamily::Other,
    is_64bit: true,
    arch: CpuArch::Other,
};

pub const NEW_BINARY_CONTENT: &[u8] = b"new binary content for testing";
pub const OLD_BINARY_CONTENT: &[u8] = b"old binary";

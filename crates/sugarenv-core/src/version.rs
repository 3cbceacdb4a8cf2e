//! Compiler version parsing and the CUDA host compiler support matrix.

/// Parse a version string into a (major, minor) tuple.
///
/// Only the leading digits of each component count, so "12.0-rc1" parses
/// as (12, 0).
pub fn parse_version_tuple(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let parse_numeric = |part: &str| -> Option<u32> {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    };
    let major = parse_numeric(parts.next()?)?;
    let minor = parse_numeric(parts.next()?)?;
    Some((major, minor))
}

/// Extract the CUDA release from `nvcc --version` output.
///
/// Looks for the "Cuda compilation tools, release X.Y, VX.Y.Z" line.
pub fn parse_nvcc_release(output: &str) -> Option<(u32, u32)> {
    output.lines().find_map(|line| {
        let (_, rest) = line.split_once("release ")?;
        let version = rest.split([',', ' ']).next()?;
        parse_version_tuple(version)
    })
}

/// Extract the compiler version from `gcc --version` style output.
///
/// The first line ends with the version, e.g.
/// "x86_64-conda-linux-gnu-cc (conda-forge gcc 11.4.0-13) 11.4.0".
pub fn parse_gcc_version(output: &str) -> Option<(u32, u32)> {
    let first_line = output.lines().next()?;
    parse_version_tuple(first_line.split_whitespace().last()?)
}

/// Newest GCC major version nvcc accepts as host compiler for a CUDA release.
///
/// Source: NVIDIA's host compiler support policy in the CUDA installation
/// guide for Linux. Returns `None` for releases outside the table.
pub const fn max_host_gcc_major(cuda: (u32, u32)) -> Option<u32> {
    match cuda {
        (11, 0) => Some(9),
        (11, 1..=3) => Some(10),
        (11, _) => Some(11),
        (12, 0..=3) => Some(12),
        (12, 4..=7) => Some(13),
        (12, _) => Some(14),
        _ => None,
    }
}

/// Result of checking a CUDA/GCC pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCompat {
    Supported,
    Unsupported { max_gcc_major: u32 },
    /// One of the versions could not be determined, or the CUDA release
    /// is not in the table.
    Unknown,
}

/// Check whether nvcc will accept `gcc` as its host compiler.
pub fn check_host_compiler(cuda: Option<(u32, u32)>, gcc: Option<(u32, u32)>) -> HostCompat {
    let (Some(cuda), Some((gcc_major, _))) = (cuda, gcc) else {
        return HostCompat::Unknown;
    };
    match max_host_gcc_major(cuda) {
        Some(max) if gcc_major <= max => HostCompat::Supported,
        Some(max_gcc_major) => HostCompat::Unsupported { max_gcc_major },
        None => HostCompat::Unknown,
    }
}

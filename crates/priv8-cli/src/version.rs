//! Version banner printed by `--version`.

use std::io::{self, Write};

const UNSET: &str = "<unset>";

/// Build metadata shown in the version banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VersionInfo {
    pub(crate) executable: &'static str,
    pub(crate) commit: &'static str,
    pub(crate) tag: &'static str,
}

impl VersionInfo {
    /// Metadata captured when this binary was compiled.
    ///
    /// Release builds set `PRIV8_VCS_COMMIT` and `PRIV8_VCS_TAG` in the
    /// build environment; anything else reports `<unset>`.
    pub(crate) const fn current() -> Self {
        Self {
            executable: concat!("priv8 ", env!("CARGO_PKG_VERSION")),
            commit: match option_env!("PRIV8_VCS_COMMIT") {
                Some(commit) => commit,
                None => UNSET,
            },
            tag: match option_env!("PRIV8_VCS_TAG") {
                Some(tag) => tag,
                None => UNSET,
            },
        }
    }

    pub(crate) fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "priv8 version:")?;
        writeln!(out, "  Executable: {}", self.executable)?;
        writeln!(out, "  VCS Commit: {}", self.commit)?;
        writeln!(out, "  VCS Tag: {}", self.tag)?;
        writeln!(
            out,
            "  Platform: {}/{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    }
}

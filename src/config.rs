//! Compile-time-ish feature profile + per-instance runtime flags.
//!
//! Each wire-format feature is three-valued: `disabled` (the field never
//! goes on the wire, full stop), `always` (the field is always on the
//! wire, the runtime flag is ignored), `dynamic` (the field goes on the
//! wire iff the instance's runtime flag is set). This module is that
//! model as a plain Rust struct of enums plus a `bitflags` bitfield —
//! one code path, one predicate function, consulted by both the receiver
//! and the encoder so they can never disagree about wire layout.

use bitflags::bitflags;

/// One of the six wire-format options that can be toggled per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Addr,
    AddrExtended,
    Flags,
    Cmd,
    Crc,
    Crc32,
}

/// How strongly a [`Feature`] is wired in for a given build/profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureMode {
    /// The field is never present on the wire; the runtime flag is ignored.
    Disabled,
    /// The field is always present on the wire; the runtime flag is ignored.
    Always,
    /// The field is present iff the instance's runtime flag is set.
    Dynamic,
}

bitflags! {
    /// Per-instance on/off switches for features configured as `Dynamic`.
    /// Ignored for features configured `Disabled` or `Always`.
    ///
    /// Default: every bit set — every dynamic feature on by default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RuntimeFlags: u8 {
        const ADDR          = 0b0000_0001;
        const ADDR_EXTENDED = 0b0000_0010;
        const FLAGS         = 0b0000_0100;
        const CMD           = 0b0000_1000;
        const CRC           = 0b0001_0000;
        const CRC32         = 0b0010_0000;
    }
}

impl Default for RuntimeFlags {
    fn default() -> Self {
        RuntimeFlags::all()
    }
}

/// The per-feature build/profile configuration for a [`crate::packet::Packet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureConfig {
    pub addr: FeatureMode,
    pub addr_extended: FeatureMode,
    pub flags: FeatureMode,
    pub cmd: FeatureMode,
    pub crc: FeatureMode,
    pub crc32: FeatureMode,
}

impl FeatureConfig {
    /// Every dynamic feature enabled, compact (non-extended) addressing,
    /// CRC-8. This is the profile a brand-new `Packet` starts from.
    pub const fn all_dynamic() -> Self {
        FeatureConfig {
            addr: FeatureMode::Dynamic,
            addr_extended: FeatureMode::Dynamic,
            flags: FeatureMode::Dynamic,
            cmd: FeatureMode::Dynamic,
            crc: FeatureMode::Dynamic,
            crc32: FeatureMode::Dynamic,
        }
    }

    fn mode(&self, feature: Feature) -> FeatureMode {
        match feature {
            Feature::Addr => self.addr,
            Feature::AddrExtended => self.addr_extended,
            Feature::Flags => self.flags,
            Feature::Cmd => self.cmd,
            Feature::Crc => self.crc,
            Feature::Crc32 => self.crc32,
        }
    }

    fn runtime_bit(feature: Feature) -> RuntimeFlags {
        match feature {
            Feature::Addr => RuntimeFlags::ADDR,
            Feature::AddrExtended => RuntimeFlags::ADDR_EXTENDED,
            Feature::Flags => RuntimeFlags::FLAGS,
            Feature::Cmd => RuntimeFlags::CMD,
            Feature::Crc => RuntimeFlags::CRC,
            Feature::Crc32 => RuntimeFlags::CRC32,
        }
    }

    /// Is `feature` present on the wire for an instance with the given
    /// runtime flags? This is the single predicate the receiver and the
    /// encoder both consult, so they can never disagree about layout.
    pub fn is_enabled(&self, feature: Feature, runtime: RuntimeFlags) -> bool {
        match self.mode(feature) {
            FeatureMode::Disabled => false,
            FeatureMode::Always => true,
            FeatureMode::Dynamic => runtime.contains(Self::runtime_bit(feature)),
        }
    }

    /// Attempt to flip a dynamic feature's runtime flag. No-op (returns
    /// `false`) for features configured `Disabled` or `Always`, since
    /// their presence on the wire isn't a runtime decision.
    pub fn set_enabled(&self, feature: Feature, runtime: &mut RuntimeFlags, on: bool) -> bool {
        if self.mode(feature) != FeatureMode::Dynamic {
            return false;
        }
        runtime.set(Self::runtime_bit(feature), on);
        true
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::all_dynamic()
    }
}

/// The header sections that may appear between `START` and `LEN`, in the
/// order they can appear on the wire. `LEN` itself is always present so it
/// isn't part of this enum — it's the implicit bottom of every chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    From,
    To,
    Flags,
    Cmd,
}

impl Section {
    fn feature(self) -> Feature {
        match self {
            Section::From | Section::To => Feature::Addr,
            Section::Flags => Feature::Flags,
            Section::Cmd => Feature::Cmd,
        }
    }

    fn next(self) -> Option<Section> {
        match self {
            Section::From => Some(Section::To),
            Section::To => Some(Section::Flags),
            Section::Flags => Some(Section::Cmd),
            Section::Cmd => None,
        }
    }
}

/// Find the first enabled section starting at (and including) `from`,
/// given the instance's feature configuration and runtime flags. Returns
/// `None` if every remaining section through `Cmd` is disabled, meaning
/// the next thing on the wire is `LEN`.
///
/// Both the receiver's state dispatch and the encoder's section-writing
/// loop call this so they never disagree about which sections are
/// present.
pub fn first_enabled_from(
    from: Section,
    config: &FeatureConfig,
    runtime: RuntimeFlags,
) -> Option<Section> {
    let mut cursor = Some(from);
    while let Some(section) = cursor {
        if config.is_enabled(section.feature(), runtime) {
            return Some(section);
        }
        cursor = section.next();
    }
    None
}

/// Find the first enabled section strictly after `section` — i.e. what
/// comes next once `section` has just finished being read or written.
/// Returns `None` when nothing enabled remains before `LEN`.
pub fn first_enabled_after(
    section: Section,
    config: &FeatureConfig,
    runtime: RuntimeFlags,
) -> Option<Section> {
    match section.next() {
        Some(next) => first_enabled_from(next, config, runtime),
        None => None,
    }
}

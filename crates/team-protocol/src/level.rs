/// Legend tier for a member level, as computed upstream from referral counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTier {
    Starter,
    DirectQualified,
    FirstLineLeader,
    SecondLineLeader,
    Elite,
}

impl LevelTier {
    /// All tiers in legend order.
    pub const ALL: [LevelTier; 5] = [
        Self::Starter,
        Self::DirectQualified,
        Self::FirstLineLeader,
        Self::SecondLineLeader,
        Self::Elite,
    ];

    /// Lowest level that belongs to this tier.
    pub fn first_level(&self) -> u32 {
        match self {
            Self::Starter => 0,
            Self::DirectQualified => 1,
            Self::FirstLineLeader => 2,
            Self::SecondLineLeader => 3,
            Self::Elite => 4,
        }
    }

    /// Legend line, e.g. `Level 1 - 10+ Direct (Unlock L2 income)`.
    pub fn legend(&self) -> String {
        match self {
            Self::Elite => format!("Level {}+ - {self}", self.first_level()),
            _ => format!("Level {} - {self}", self.first_level()),
        }
    }
}

impl std::fmt::Display for LevelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Starter => "Starter",
            Self::DirectQualified => "10+ Direct (Unlock L2 income)",
            Self::FirstLineLeader => "10+ L1 members",
            Self::SecondLineLeader => "10+ L2 members",
            Self::Elite => "Elite Status",
        };
        write!(f, "{s}")
    }
}

/// Accent color family for a level. Levels cycle through three accents;
/// levels past 5 fall back to the primary accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAccent {
    Primary,
    Dark,
    Light,
}

impl LevelAccent {
    /// RGB of the accent.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Primary => (0x11, 0xE4, 0x4F),
            Self::Dark => (0x12, 0x12, 0x12),
            Self::Light => (0x8A, 0xFF, 0xAC),
        }
    }
}

pub fn accent_for_level(level: u32) -> LevelAccent {
    match level {
        0 | 3 => LevelAccent::Primary,
        1 | 4 => LevelAccent::Dark,
        2 | 5 => LevelAccent::Light,
        _ => LevelAccent::Primary,
    }
}

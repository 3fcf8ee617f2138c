/// Accent used when a colour hint is missing or unknown.
pub const DEFAULT_ACCENT: u32 = 0x64ffda;

pub struct ColorToken {
    pub token: &'static str,
    pub rgb: u32,
}

/// Semantic colour tokens used by moodboard entries.
pub const COLOR_TOKENS: &[ColorToken] = &[
    ColorToken {
        token: "bg-blue-100 dark:bg-blue-900/30",
        rgb: 0x3b82f6,
    },
    ColorToken {
        token: "bg-purple-100 dark:bg-purple-900/30",
        rgb: 0x8b5cf6,
    },
    ColorToken {
        token: "bg-green-100 dark:bg-green-900/30",
        rgb: 0x10b981,
    },
    ColorToken {
        token: "bg-yellow-100 dark:bg-yellow-900/30",
        rgb: 0xf59e0b,
    },
    ColorToken {
        token: "bg-pink-100 dark:bg-pink-900/30",
        rgb: 0xec4899,
    },
    ColorToken {
        token: "bg-indigo-100 dark:bg-indigo-900/30",
        rgb: 0x6366f1,
    },
    ColorToken {
        token: "bg-teal-100 dark:bg-teal-900/30",
        rgb: 0x14b8a6,
    },
    ColorToken {
        token: "bg-orange-100 dark:bg-orange-900/30",
        rgb: 0xf97316,
    },
    ColorToken {
        token: "bg-red-100 dark:bg-red-900/30",
        rgb: 0xef4444,
    },
    ColorToken {
        token: "bg-gray-100 dark:bg-gray-800",
        rgb: 0x6b7280,
    },
];

/// Repository language colours.
pub const LANGUAGE_COLORS: &[ColorToken] = &[
    ColorToken {
        token: "JavaScript",
        rgb: 0xf1e05a,
    },
    ColorToken {
        token: "TypeScript",
        rgb: 0x2b7489,
    },
    ColorToken {
        token: "Python",
        rgb: 0x3572a5,
    },
    ColorToken {
        token: "Solidity",
        rgb: 0xaa6746,
    },
    ColorToken {
        token: "Go",
        rgb: 0x00add8,
    },
    ColorToken {
        token: "Rust",
        rgb: 0xdea584,
    },
    ColorToken {
        token: "Java",
        rgb: 0xb07219,
    },
    ColorToken {
        token: "C++",
        rgb: 0xf34b7d,
    },
    ColorToken {
        token: "HTML",
        rgb: 0xe34c26,
    },
    ColorToken {
        token: "CSS",
        rgb: 0x1572b6,
    },
    ColorToken {
        token: "Vue",
        rgb: 0x4fc08d,
    },
    ColorToken {
        token: "React",
        rgb: 0x61dafb,
    },
    ColorToken {
        token: "Shell",
        rgb: 0x89e051,
    },
];

pub fn lookup_color(table: &[ColorToken], token: &str) -> Option<u32> {
    table.iter().find(|c| c.token == token).map(|c| c.rgb)
}

use std::fmt;

/// Disc region of a game image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Ntsc,
    Pal,
    NtscJ,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Ntsc => f.write_str("NTSC"),
            Region::Pal => f.write_str("PAL"),
            Region::NtscJ => f.write_str("NTSC-J"),
        }
    }
}

/// An entry in the game library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: &'static str,
    pub title: &'static str,
    /// Compatibility percentage, 0..=100.
    pub compatibility: u8,
    pub region: Region,
    pub size_label: &'static str,
    pub last_played: Option<&'static str>,
}

static BUILTIN_GAMES: [Game; 8] = [
    Game {
        id: "1",
        title: "Final Fantasy X",
        compatibility: 95,
        region: Region::Ntsc,
        size_label: "3.4 GB",
        last_played: Some("2023-04-10T15:30:00"),
    },
    Game {
        id: "2",
        title: "Gran Turismo 4",
        compatibility: 85,
        region: Region::Pal,
        size_label: "4.2 GB",
        last_played: Some("2023-04-05T10:15:00"),
    },
    Game {
        id: "3",
        title: "Metal Gear Solid 3: Snake Eater",
        compatibility: 90,
        region: Region::Ntsc,
        size_label: "3.8 GB",
        last_played: None,
    },
    Game {
        id: "4",
        title: "Shadow of the Colossus",
        compatibility: 88,
        region: Region::Ntsc,
        size_label: "3.1 GB",
        last_played: None,
    },
    Game {
        id: "5",
        title: "God of War II",
        compatibility: 92,
        region: Region::Ntsc,
        size_label: "4.0 GB",
        last_played: Some("2023-03-15T20:45:00"),
    },
    Game {
        id: "6",
        title: "Okami",
        compatibility: 80,
        region: Region::NtscJ,
        size_label: "3.5 GB",
        last_played: None,
    },
    Game {
        id: "7",
        title: "Kingdom Hearts II",
        compatibility: 87,
        region: Region::Ntsc,
        size_label: "3.7 GB",
        last_played: None,
    },
    Game {
        id: "8",
        title: "Persona 4",
        compatibility: 85,
        region: Region::NtscJ,
        size_label: "3.2 GB",
        last_played: None,
    },
];

/// The bundled game list.
pub fn builtin_games() -> &'static [Game] {
    &BUILTIN_GAMES
}

/// Games whose title contains `query`, ignoring case. An empty query matches everything.
pub fn search_games<'a>(games: &'a [Game], query: &str) -> Vec<&'a Game> {
    let needle = query.trim().to_lowercase();
    games
        .iter()
        .filter(|game| game.title.to_lowercase().contains(&needle))
        .collect()
}

/// Colour class of a game card's compatibility bar.
pub fn compatibility_color(percent: u8) -> &'static str {
    match percent {
        90.. => "bg-green-500",
        70..=89 => "bg-yellow-500",
        50..=69 => "bg-orange-500",
        _ => "bg-red-500",
    }
}

impl Game {
    /// One-line summary shown when a game is launched.
    pub fn launch_summary(&self) -> String {
        format!(
            "{} • {} • {}% compatible",
            self.region, self.size_label, self.compatibility
        )
    }
}

/// A place the story can happen in. Called "environment" in some labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The lesson the story is built around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub static SETTINGS: [Setting; 5] = [
    Setting {
        id: "fantasy",
        name: "Fantasy Kingdom",
        description: "A magical land with castles, dragons, and adventure around every corner!",
        icon: "castle",
        color: "storyworld-fantasy",
    },
    Setting {
        id: "space",
        name: "Outer Space",
        description: "Explore distant planets, meet friendly aliens, and discover the wonders of the universe.",
        icon: "rocket",
        color: "storyworld-space",
    },
    Setting {
        id: "forest",
        name: "Enchanted Forest",
        description: "Towering trees, friendly animals, and magical plants fill this special woodland.",
        icon: "trees",
        color: "storyworld-forest",
    },
    Setting {
        id: "underwater",
        name: "Underwater Adventure",
        description: "Dive deep beneath the waves to explore coral reefs and meet colorful sea creatures.",
        icon: "fish",
        color: "storyworld-underwater",
    },
    Setting {
        id: "mystery",
        name: "Mystery City",
        description: "Solve puzzles and follow clues in a city full of surprises and friendly neighborhoods.",
        icon: "search",
        color: "storyworld-mystery",
    },
];

pub static THEMES: [Theme; 5] = [
    Theme {
        id: "friendship",
        name: "Friendship",
        description: "A story about making new friends and working together through challenges.",
        icon: "heart-handshake",
    },
    Theme {
        id: "courage",
        name: "Courage",
        description: "Face fears and discover inner strength on an exciting journey.",
        icon: "shield",
    },
    Theme {
        id: "discovery",
        name: "Discovery",
        description: "Explore new places and learn amazing things about the world.",
        icon: "compass",
    },
    Theme {
        id: "teamwork",
        name: "Teamwork",
        description: "Join forces to accomplish goals that can't be achieved alone.",
        icon: "users",
    },
    Theme {
        id: "obstacles",
        name: "Overcoming Obstacles",
        description: "Find creative ways to solve problems and overcome challenges.",
        icon: "mountain",
    },
];

pub fn setting_by_id(id: &str) -> Option<&'static Setting> {
    SETTINGS.iter().find(|s| s.id == id)
}

pub fn theme_by_id(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

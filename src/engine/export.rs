use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::story::StoryContent;

/// Plain-text rendering used by "Save Story". Illustrations are not included.
pub fn story_to_text(story: &StoryContent) -> String {
    let mut out = String::new();

    out.push_str(&story.title);
    out.push_str("\n\n");
    out.push_str(&story.introduction);
    out.push_str("\n\n");

    for (i, scene) in story.scenes.iter().enumerate() {
        out.push_str(&format!("Scene {}:\n", i + 1));
        out.push_str(&scene.description);
        out.push_str("\n\n");
        for line in &scene.dialogue {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&story.conclusion);
    out.push('\n');
    out
}

/// "Mira's Courage Adventure" → "Mira's_Courage_Adventure.txt"
pub fn suggested_filename(title: &str) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "-");

    if stem.is_empty() {
        "story.txt".to_string()
    } else {
        format!("{stem}.txt")
    }
}

pub fn write_story(path: &Path, story: &StoryContent) -> Result<()> {
    fs::write(path, story_to_text(story))
        .with_context(|| format!("failed to save story to {}", path.display()))?;
    tracing::info!(path = %path.display(), "story saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::synthesizer::synthesize;
    use crate::model::catalog::{setting_by_id, theme_by_id};
    use crate::model::character::Character;

    fn story() -> StoryContent {
        let mut mira = Character::new(1);
        mira.name = "Mira".into();
        mira.personality = "bold".into();
        mira.add_trait("brave").unwrap();
        synthesize(
            setting_by_id("underwater").unwrap(),
            theme_by_id("friendship").unwrap(),
            &[mira],
        )
        .unwrap()
    }

    #[test]
    fn text_contains_every_part_in_order() {
        let story = story();
        let text = story_to_text(&story);

        assert!(text.starts_with(&story.title));
        let intro = text.find(&story.introduction).unwrap();
        let scene_one = text.find("Scene 1:").unwrap();
        let scene_three = text.find("Scene 3:").unwrap();
        let end = text.find(&story.conclusion).unwrap();
        assert!(intro < scene_one && scene_one < scene_three && scene_three < end);

        for scene in &story.scenes {
            assert!(text.contains(&scene.description));
            for line in &scene.dialogue {
                assert!(text.contains(line.as_str()));
            }
        }
    }

    #[test]
    fn filename_collapses_whitespace() {
        assert_eq!(
            suggested_filename("Mira's Courage  Adventure\tin the Forest"),
            "Mira's_Courage_Adventure_in_the_Forest.txt"
        );
        assert_eq!(suggested_filename("A/B"), "A-B.txt");
        assert_eq!(suggested_filename("   "), "story.txt");
    }

    #[test]
    fn write_story_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        let story = story();

        write_story(&path, &story).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), story_to_text(&story));
    }

    #[test]
    fn write_story_reports_bad_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("story.txt");
        let err = write_story(&path, &story()).unwrap_err();
        assert!(err.to_string().contains("failed to save story"));
    }
}

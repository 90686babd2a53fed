//! Script statistics: totals, per-scene breakdown, characters, locations
//! and a three-act split, plus a CSV report of the lot.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::export::projection::page_count;
use crate::models::{BlockType, Project, Scene};

/// Reading pace used for per-scene screen time.
pub const WORDS_PER_MINUTE: usize = 150;
const DESCRIPTION_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStats {
    pub total_words: usize,
    pub total_pages: usize,
    /// Minutes; one page plays for about a minute.
    pub estimated_runtime: usize,
    pub total_scenes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Act {
    One,
    Two,
    Three,
}

impl Act {
    /// Act of a scene when the script is cut into even thirds.
    pub fn of_scene(index: usize, total: usize) -> Act {
        // index >= total * 2/3, kept in integers
        if index * 3 >= total * 2 {
            Act::Three
        } else if index * 3 >= total {
            Act::Two
        } else {
            Act::One
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Act::One => "Act I",
            Act::Two => "Act II",
            Act::Three => "Act III",
        }
    }
}

/// Board card summary of one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneCard {
    pub number: usize,
    /// First scene heading, or `Scene N` when there is none.
    pub heading: String,
    pub word_count: usize,
    pub estimated_minutes: usize,
    pub act: Act,
    /// Start of the first action line.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterStats {
    pub name: String,
    pub initials: String,
    /// Dialogue blocks spoken.
    pub lines: usize,
    /// Words across those dialogue blocks.
    pub words: usize,
    pub scenes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationStats {
    pub name: String,
    pub count: usize,
}

/// Scene counts per act, with the acts split at a quarter and three
/// quarters of the way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActStructure {
    pub act_one: usize,
    pub act_two: usize,
    pub act_three: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    pub stats: ScriptStats,
    pub scenes: Vec<SceneCard>,
    pub characters: Vec<CharacterStats>,
    pub locations: Vec<LocationStats>,
    pub acts: ActStructure,
}

pub fn report(project: &Project) -> ScriptReport {
    ScriptReport {
        stats: script_stats(project),
        scenes: scene_cards(project),
        characters: character_stats(project),
        locations: location_stats(project),
        acts: act_structure(project.scene_count()),
    }
}

pub fn script_stats(project: &Project) -> ScriptStats {
    let total_words = project.scenes().iter().map(Scene::word_count).sum();
    let total_pages = page_count(total_words);
    ScriptStats {
        total_words,
        total_pages,
        estimated_runtime: total_pages,
        total_scenes: project.scene_count(),
    }
}

pub fn scene_cards(project: &Project) -> Vec<SceneCard> {
    let total = project.scene_count();
    project
        .scenes()
        .iter()
        .enumerate()
        .map(|(index, scene)| {
            let word_count = scene.word_count();
            let heading = scene
                .blocks()
                .iter()
                .find(|b| b.block_type == BlockType::SceneHeading)
                .map_or_else(|| format!("Scene {}", index + 1), |b| b.text.clone());
            SceneCard {
                number: index + 1,
                heading,
                word_count,
                estimated_minutes: minutes(word_count),
                act: Act::of_scene(index, total),
                description: description(scene),
            }
        })
        .collect()
}

/// Per-character dialogue stats, most words first. Dialogue belongs to the
/// closest character cue above it in the same scene.
pub fn character_stats(project: &Project) -> Vec<CharacterStats> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, CharacterStats> = HashMap::new();

    for scene in project.scenes() {
        let mut speaker: Option<String> = None;
        let mut present: HashSet<String> = HashSet::new();

        for block in scene.blocks() {
            match block.block_type {
                BlockType::Character if !block.is_placeholder() => {
                    let name = block.text.trim().to_string();
                    if !by_name.contains_key(&name) {
                        order.push(name.clone());
                        by_name.insert(name.clone(), CharacterStats::named(&name));
                    }
                    present.insert(name.clone());
                    speaker = Some(name);
                }
                BlockType::Dialogue => {
                    if let Some(name) = &speaker
                        && let Some(stats) = by_name.get_mut(name)
                    {
                        stats.lines += 1;
                        stats.words += block.text.split_whitespace().count();
                    }
                }
                _ => {}
            }
        }

        for name in present {
            if let Some(stats) = by_name.get_mut(&name) {
                stats.scenes += 1;
            }
        }
    }

    let mut characters: Vec<CharacterStats> = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect();
    characters.sort_by(|a, b| b.words.cmp(&a.words));
    characters
}

/// Scene heading occurrences, most frequent first.
pub fn location_stats(project: &Project) -> Vec<LocationStats> {
    let mut locations: Vec<LocationStats> = Vec::new();
    let headings = project
        .scenes()
        .iter()
        .flat_map(Scene::blocks)
        .filter(|b| b.block_type == BlockType::SceneHeading && !b.is_placeholder());

    for block in headings {
        let name = block.text.trim();
        match locations.iter_mut().find(|l| l.name == name) {
            Some(location) => location.count += 1,
            None => locations.push(LocationStats {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    locations.sort_by(|a, b| b.count.cmp(&a.count));
    locations
}

pub fn act_structure(scene_count: usize) -> ActStructure {
    let act_one_end = scene_count / 4;
    let act_two_end = scene_count * 3 / 4;
    ActStructure {
        act_one: act_one_end,
        act_two: act_two_end - act_one_end,
        act_three: scene_count - act_two_end,
    }
}

/// Two-letter avatar initials: the first letters of the first two words,
/// or the first two characters of a one-word name.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let initials: String = match (words.next(), words.next()) {
        (Some(first), Some(second)) => first.chars().take(1).chain(second.chars().take(1)).collect(),
        _ => name.trim().chars().take(2).collect(),
    };
    initials.to_uppercase()
}

pub fn stats_csv(project: &Project) -> String {
    report(project).to_csv()
}

impl ScriptReport {
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Script Scribbler - Statistics Export\n\n");
        let s = &self.stats;

        csv.push_str(&format!(
            "Overall Statistics\nMetric,Value\n\
             Total Pages,{}\nEstimated Runtime (minutes),{}\n\
             Total Scenes,{}\nTotal Words,{}\n\n",
            s.total_pages, s.estimated_runtime, s.total_scenes, s.total_words
        ));

        csv.push_str("Character Statistics\nCharacter,Lines,Words,Scenes\n");
        for c in &self.characters {
            csv.push_str(&format!("{},{},{},{}\n", quote(&c.name), c.lines, c.words, c.scenes));
        }

        csv.push_str("\nLocation Statistics\nLocation,Scene Count\n");
        for l in &self.locations {
            csv.push_str(&format!("{},{}\n", quote(&l.name), l.count));
        }

        csv.push_str("\nScene Breakdown\nScene,Words\n");
        for card in &self.scenes {
            csv.push_str(&format!("Scene {},{}\n", card.number, card.word_count));
        }
        csv
    }
}

impl CharacterStats {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initials: initials(name),
            lines: 0,
            words: 0,
            scenes: 0,
        }
    }
}

fn minutes(words: usize) -> usize {
    // round(words / 150), at least one
    ((words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE).max(1)
}

fn description(scene: &Scene) -> Option<String> {
    let action = scene
        .blocks()
        .iter()
        .find(|b| b.block_type == BlockType::Action && !b.is_placeholder())?;
    let text = action.text.trim();
    if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let cut: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        Some(format!("{cut}..."))
    } else {
        Some(text.to_string())
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;
    use crate::tests::sample_project;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scene(blocks: &[(BlockType, &str)]) -> Scene {
        Scene::new(blocks.iter().map(|(t, s)| Block::new(*t, *s)).collect())
    }

    fn headings_only(n: usize) -> Project {
        let scenes = (0..n)
            .map(|i| scene(&[(BlockType::SceneHeading, format!("INT. ROOM {i}").as_str())]))
            .collect();
        Project::from_scenes(scenes, 0)
    }

    #[test]
    fn test_script_stats_totals() {
        let stats = script_stats(&sample_project());
        assert_eq!(
            stats,
            ScriptStats {
                total_words: 22,
                total_pages: 1,
                estimated_runtime: 1,
                total_scenes: 2,
            }
        );
    }

    #[test]
    fn test_dialogue_attributed_to_last_cue() {
        let project = Project::from_scenes(
            vec![
                scene(&[
                    (BlockType::Dialogue, "Nobody speaking yet."),
                    (BlockType::Character, "ANA"),
                    (BlockType::Dialogue, "One two three."),
                    (BlockType::Action, "She sits."),
                    (BlockType::Dialogue, "Four."),
                    (BlockType::Character, "BEN"),
                    (BlockType::Dialogue, "Five."),
                ]),
                scene(&[
                    (BlockType::Character, "BEN "),
                    (BlockType::Dialogue, "Six seven eight nine ten."),
                ]),
            ],
            0,
        );

        let stats = character_stats(&project);

        assert_eq!(stats.len(), 2);
        let summary: Vec<_> = stats
            .iter()
            .map(|c| (c.name.as_str(), c.lines, c.words, c.scenes))
            .collect();
        assert_eq!(summary, vec![("BEN", 2, 6, 2), ("ANA", 2, 4, 1)]);
    }

    #[test]
    fn test_locations_counted_and_sorted() {
        let project = Project::from_scenes(
            vec![
                scene(&[(BlockType::SceneHeading, "INT. DINER - NIGHT")]),
                scene(&[(BlockType::SceneHeading, "EXT. ROAD - DAY")]),
                scene(&[(BlockType::SceneHeading, "EXT. ROAD - DAY ")]),
            ],
            0,
        );
        assert_eq!(
            location_stats(&project),
            vec![
                LocationStats { name: "EXT. ROAD - DAY".to_string(), count: 2 },
                LocationStats { name: "INT. DINER - NIGHT".to_string(), count: 1 },
            ]
        );
    }

    #[rstest]
    #[case(0, (0, 0, 0))]
    #[case(1, (0, 0, 1))]
    #[case(4, (1, 2, 1))]
    #[case(10, (2, 5, 3))]
    fn test_act_structure(#[case] scenes: usize, #[case] expected: (usize, usize, usize)) {
        let acts = act_structure(scenes);
        assert_eq!((acts.act_one, acts.act_two, acts.act_three), expected);
    }

    #[rstest]
    #[case(0, 6, Act::One)]
    #[case(1, 6, Act::One)]
    #[case(2, 6, Act::Two)]
    #[case(3, 6, Act::Two)]
    #[case(4, 6, Act::Three)]
    #[case(0, 1, Act::One)]
    fn test_scene_act_by_thirds(#[case] index: usize, #[case] total: usize, #[case] act: Act) {
        assert_eq!(Act::of_scene(index, total), act);
    }

    #[rstest]
    #[case("MARY JANE WATSON", "MJ")]
    #[case("bob", "BO")]
    #[case("Q", "Q")]
    fn test_initials(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(initials(name), expected);
    }

    #[test]
    fn test_scene_cards() {
        let long_action = "word ".repeat(40);
        let project = Project::from_scenes(
            vec![
                scene(&[
                    (BlockType::SceneHeading, "INT. LAB - DAY"),
                    (BlockType::Action, long_action.as_str()),
                ]),
                scene(&[(BlockType::Action, "")]),
                headings_only(1).scenes()[0].clone(),
            ],
            0,
        );

        let cards = scene_cards(&project);

        assert_eq!(cards[0].heading, "INT. LAB - DAY");
        assert_eq!(cards[0].word_count, 44);
        assert_eq!(cards[0].estimated_minutes, 1);
        let description = cards[0].description.as_deref().unwrap();
        assert_eq!(description.chars().count(), 83);
        assert!(description.ends_with("..."));

        assert_eq!(cards[1].heading, "Scene 2");
        assert_eq!(cards[1].description, None);
        assert_eq!(cards[1].act, Act::Two);
        assert_eq!(cards[2].act, Act::Three);
    }

    #[test]
    fn test_minutes_rounds_with_floor_of_one() {
        assert_eq!(minutes(0), 1);
        assert_eq!(minutes(224), 1);
        assert_eq!(minutes(225), 2);
        assert_eq!(minutes(450), 3);
    }

    #[test]
    fn test_csv_report() {
        let csv = stats_csv(&sample_project());

        assert!(csv.starts_with("Script Scribbler - Statistics Export\n\n"));
        assert!(csv.contains("Total Pages,1\n"));
        assert!(csv.contains("Total Scenes,2\n"));
        assert!(csv.contains("Character,Lines,Words,Scenes\n\"JONAH\",1,4,1\n\"MAYA\",1,2,1\n"));
        assert!(csv.contains("\"INT. DINER - NIGHT\",1\n"));
        assert!(csv.ends_with("Scene Breakdown\nScene,Words\nScene 1,11\nScene 2,11\n"));
    }

    #[test]
    fn test_csv_quotes_are_doubled() {
        assert_eq!(quote("THE \"BOSS\""), "\"THE \"\"BOSS\"\"\"");
    }
}

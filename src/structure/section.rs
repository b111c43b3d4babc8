//! Section and sub-section assignment.
//!
//! Items are visited in document order. For each, the headings on its page
//! at or above its top edge decide the (section, sub_section) pair; with no
//! such heading the previous pair carries forward, across page boundaries.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::heading::HeadingCandidate;

/// The running section context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionState {
    /// Top-level section heading
    pub section: Option<String>,
    /// Deeper heading within the section
    pub sub_section: Option<String>,
}

impl SectionState {
    /// Create a state from its parts.
    pub fn new(section: Option<&str>, sub_section: Option<&str>) -> Self {
        Self {
            section: section.map(str::to_string),
            sub_section: sub_section.map(str::to_string),
        }
    }
}

fn numbered_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)\s+(.+)$").expect("valid heading regex"))
}

/// Depth of a numbered heading: "2" is 1, "2.3" is 2, "2.3.1" is 3.
///
/// `None` for plain headings, including "1. Introduction" whose number is
/// followed by a dot rather than whitespace.
pub fn heading_level(text: &str) -> Option<usize> {
    numbered_heading()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|numbering| numbering.as_str().matches('.').count() + 1)
}

/// Next state given the headings visible above an item, in ascending top-y.
fn resolve(previous: &SectionState, visible: &[&HeadingCandidate]) -> SectionState {
    if visible.is_empty() {
        return previous.clone();
    }

    let mut levels: BTreeMap<usize, &str> = BTreeMap::new();
    let mut plain: Option<&str> = None;
    for heading in visible {
        match heading_level(&heading.text) {
            Some(level) => {
                levels.insert(level, &heading.text);
            }
            None => plain = Some(&heading.text),
        }
    }

    let mut section = previous.section.clone();
    let mut sub_section = previous.sub_section.clone();

    if levels.is_empty() {
        if let Some(plain) = plain {
            match &section {
                None => {
                    section = Some(plain.to_string());
                    sub_section = None;
                }
                Some(current) if current != plain => sub_section = Some(plain.to_string()),
                Some(_) => {}
            }
        }
    } else {
        if let Some(top) = levels.get(&1) {
            section = Some(top.to_string());
        }
        sub_section = levels.range(2..).next_back().map(|(_, text)| text.to_string());

        if let Some(plain) = plain {
            match &section {
                None => section = Some(plain.to_string()),
                Some(current) if current != plain => sub_section = Some(plain.to_string()),
                Some(_) => {}
            }
        }
    }

    SectionState {
        section,
        sub_section,
    }
}

/// Assign a section state to each item.
///
/// `items` are `(page_number, top_y)` pairs in document order; `headings`
/// maps page numbers to that page's candidates. The result is parallel to
/// `items`. The first item starts from an empty state.
pub fn assign_sections<I>(
    items: I,
    headings: &BTreeMap<u32, Vec<HeadingCandidate>>,
) -> Vec<SectionState>
where
    I: IntoIterator<Item = (u32, f32)>,
{
    items
        .into_iter()
        .scan(SectionState::default(), |state, (page, top)| {
            let mut visible: Vec<&HeadingCandidate> = headings
                .get(&page)
                .map(|hs| hs.iter().filter(|h| h.bbox.top() <= top).collect())
                .unwrap_or_default();
            visible.sort_by(|a, b| {
                a.bbox
                    .top()
                    .partial_cmp(&b.bbox.top())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            *state = resolve(state, &visible);
            Some(state.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn heading(text: &str, top: f32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            bbox: BBox::new(72.0, top, 400.0, top + 16.0),
            confidence: 1.5,
            element: 0,
        }
    }

    fn on_page(page: u32, hs: Vec<HeadingCandidate>) -> BTreeMap<u32, Vec<HeadingCandidate>> {
        BTreeMap::from([(page, hs)])
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("1 Introduction"), Some(1));
        assert_eq!(heading_level("1.1 Details"), Some(2));
        assert_eq!(heading_level("2.3.4 Deep"), Some(3));
        assert_eq!(heading_level("1. Introduction"), None);
        assert_eq!(heading_level("Abstract"), None);
        assert_eq!(heading_level("12"), None);
        assert_eq!(heading_level("1.a Mixed"), None);
    }

    #[test]
    fn test_numbered_hierarchy() {
        let headings = on_page(1, vec![heading("1 Overview", 50.0), heading("1.1 Details", 150.0)]);
        let states = assign_sections([(1, 100.0), (1, 200.0)], &headings);
        assert_eq!(states[0], SectionState::new(Some("1 Overview"), None));
        assert_eq!(
            states[1],
            SectionState::new(Some("1 Overview"), Some("1.1 Details"))
        );
    }

    #[test]
    fn test_dotted_plain_then_numbered_sub() {
        let headings = on_page(
            1,
            vec![heading("1. Overview", 50.0), heading("1.1 Details", 100.0)],
        );
        let states = assign_sections([(1, 130.0)], &headings);
        assert_eq!(
            states[0],
            SectionState::new(Some("1. Overview"), Some("1.1 Details"))
        );
    }

    #[test]
    fn test_carry_forward_across_pages() {
        let headings = on_page(1, vec![heading("2 Methods", 60.0)]);
        let states = assign_sections([(1, 40.0), (1, 90.0), (2, 10.0), (3, 700.0)], &headings);
        assert_eq!(states[0], SectionState::default());
        assert_eq!(states[1], SectionState::new(Some("2 Methods"), None));
        assert_eq!(states[2], states[1]);
        assert_eq!(states[3], states[1]);
    }

    #[test]
    fn test_heading_at_same_top_is_visible() {
        let headings = on_page(1, vec![heading("Abstract", 100.0)]);
        let states = assign_sections([(1, 100.0)], &headings);
        assert_eq!(states[0], SectionState::new(Some("Abstract"), None));
    }

    #[test]
    fn test_new_top_level_clears_sub_section() {
        let headings = BTreeMap::from([
            (1, vec![heading("1 Intro", 50.0), heading("1.2 Scope", 100.0)]),
            (2, vec![heading("2 Design", 50.0)]),
        ]);
        let states = assign_sections([(1, 120.0), (2, 80.0)], &headings);
        assert_eq!(states[0], SectionState::new(Some("1 Intro"), Some("1.2 Scope")));
        assert_eq!(states[1], SectionState::new(Some("2 Design"), None));
    }

    #[test]
    fn test_deeper_level_without_top_level_keeps_section() {
        let headings = BTreeMap::from([
            (1, vec![heading("3 Results", 50.0)]),
            (2, vec![heading("3.2 Latency", 40.0)]),
        ]);
        let states = assign_sections([(1, 70.0), (2, 60.0)], &headings);
        assert_eq!(
            states[1],
            SectionState::new(Some("3 Results"), Some("3.2 Latency"))
        );
    }

    /// Precedence when plain and numbered headings are visible together.
    #[test]
    fn test_plain_and_numbered_overlap() {
        struct Case {
            name: &'static str,
            previous: SectionState,
            visible: Vec<(&'static str, f32)>,
            expected: SectionState,
        }

        let cases = vec![
            Case {
                name: "plain only, no section yet: plain becomes section",
                previous: SectionState::default(),
                visible: vec![("Preface", 10.0)],
                expected: SectionState::new(Some("Preface"), None),
            },
            Case {
                name: "plain only, section set: plain becomes sub-section",
                previous: SectionState::new(Some("1 Intro"), None),
                visible: vec![("Background", 10.0)],
                expected: SectionState::new(Some("1 Intro"), Some("Background")),
            },
            Case {
                name: "plain equal to section: nothing changes",
                previous: SectionState::new(Some("Preface"), None),
                visible: vec![("Preface", 10.0)],
                expected: SectionState::new(Some("Preface"), None),
            },
            Case {
                name: "older plain above new level 1: plain still wins sub-section",
                previous: SectionState::new(Some("Preface"), None),
                visible: vec![("Preface", 10.0), ("1 Intro", 50.0)],
                expected: SectionState::new(Some("1 Intro"), Some("Preface")),
            },
            Case {
                name: "plain overrides a deeper numbered heading",
                previous: SectionState::default(),
                visible: vec![("1 Intro", 10.0), ("1.1 Goals", 30.0), ("Notes", 50.0)],
                expected: SectionState::new(Some("1 Intro"), Some("Notes")),
            },
            Case {
                name: "deeper numbered without section: plain becomes section",
                previous: SectionState::default(),
                visible: vec![("Summary", 10.0), ("2.1 Costs", 30.0)],
                expected: SectionState::new(Some("Summary"), Some("2.1 Costs")),
            },
            Case {
                name: "deepest numbered level wins sub-section",
                previous: SectionState::default(),
                visible: vec![("4 Eval", 10.0), ("4.1.2 Setup", 20.0), ("4.2 Runs", 30.0)],
                expected: SectionState::new(Some("4 Eval"), Some("4.1.2 Setup")),
            },
        ];

        for case in cases {
            let headings: Vec<HeadingCandidate> = case
                .visible
                .iter()
                .map(|&(text, top)| heading(text, top))
                .collect();
            let visible: Vec<&HeadingCandidate> = headings.iter().collect();
            assert_eq!(
                resolve(&case.previous, &visible),
                case.expected,
                "{}",
                case.name
            );
        }
    }

    #[test]
    fn test_candidates_sorted_by_top() {
        // Emission order differs from vertical order; the lower level 1 wins.
        let headings = on_page(1, vec![heading("2 Later", 300.0), heading("1 Earlier", 100.0)]);
        let states = assign_sections([(1, 400.0)], &headings);
        assert_eq!(states[0], SectionState::new(Some("2 Later"), None));
    }
}

//! Mind-growth report sections.
//!
//! The report arrives as loosely structured markdown. Grammar:
//!
//! ```text
//! report  := preamble section*
//! preamble := line*            (discarded, includes the "# ..." title)
//! section := heading body
//! heading := ws* "## " title   (level two only; "### " stays in the body)
//! body    := line*             (until the next heading or end of text)
//! ```
//!
//! Bodies are joined with `\n` and trimmed. A repeated title replaces the earlier
//! section. Sections that are absent have no entry at all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const HEADING_MARKER: &str = "## ";

/// The three sections a report is asked to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSectionKind {
    EmotionAnalysis,
    BehaviorAnalysis,
    GrowthSuggestions,
}

impl ReportSectionKind {
    /// Render order.
    pub const ALL: [ReportSectionKind; 3] = [
        ReportSectionKind::EmotionAnalysis,
        ReportSectionKind::BehaviorAnalysis,
        ReportSectionKind::GrowthSuggestions,
    ];

    /// Heading text the report prompt asks for, emoji included.
    pub fn heading(self) -> &'static str {
        match self {
            ReportSectionKind::EmotionAnalysis => "감정 탐험하기 🎨",
            ReportSectionKind::BehaviorAnalysis => "생각과 행동의 힘 💪",
            ReportSectionKind::GrowthSuggestions => "성장을 위한 제안 ✨",
        }
    }

    /// Title shown above the rendered block.
    pub fn display_title(self) -> &'static str {
        match self {
            ReportSectionKind::EmotionAnalysis => "감정 탐험하기",
            ReportSectionKind::BehaviorAnalysis => "생각과 행동의 힘",
            ReportSectionKind::GrowthSuggestions => "성장을 위한 제안",
        }
    }
}

/// One block of the report ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBlock {
    pub kind: ReportSectionKind,
    pub title: String,
    pub body: String,
}

/// Title → body mapping parsed from a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSections {
    sections: HashMap<String, String>,
}

impl ReportSections {
    /// Parse report text. `None` or empty text yields no sections.
    pub fn parse(report: Option<&str>) -> Self {
        let mut sections = HashMap::new();
        let Some(text) = report else {
            return Self { sections };
        };

        let mut current: Option<(String, Vec<&str>)> = None;
        for line in text.lines() {
            if let Some(title) = heading_title(line) {
                if let Some((title, body)) = current.take() {
                    sections.insert(title, join_body(&body));
                }
                current = Some((title.to_string(), Vec::new()));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line);
            }
        }
        if let Some((title, body)) = current {
            sections.insert(title, join_body(&body));
        }

        Self { sections }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.sections.get(title).map(String::as_str)
    }

    pub fn section(&self, kind: ReportSectionKind) -> Option<&str> {
        self.get(kind.heading())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Expected sections present with a non-empty body, in render order.
    pub fn blocks(&self) -> Vec<ReportBlock> {
        ReportSectionKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.section(kind)
                    .filter(|body| !body.is_empty())
                    .map(|body| ReportBlock {
                        kind,
                        title: kind.display_title().to_string(),
                        body: body.to_string(),
                    })
            })
            .collect()
    }
}

fn heading_title(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(HEADING_MARKER)
        .map(str::trim)
}

fn join_body(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# 마음 성장 리포트 쑥쑥 🌱\n\
        소개 문장\n\
        ## 감정 탐험하기 🎨\n\
        감정을 잘 알아차렸어요.\n\
        \n\
        두 번째 문단이에요.\n\
        ## 생각과 행동의 힘 💪\n\
        ### 작은 제목\n\
        솔직하게 말했어요.\n\
        ## 성장을 위한 제안 ✨\n\
        다음에는 이렇게 해보면 어떨까요?\n";

    #[test]
    fn splits_sections_by_level_two_headings() {
        let sections = ReportSections::parse(Some(REPORT));
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections.section(ReportSectionKind::EmotionAnalysis),
            Some("감정을 잘 알아차렸어요.\n\n두 번째 문단이에요.")
        );
        assert_eq!(
            sections.section(ReportSectionKind::BehaviorAnalysis),
            Some("### 작은 제목\n솔직하게 말했어요.")
        );
        assert_eq!(
            sections.section(ReportSectionKind::GrowthSuggestions),
            Some("다음에는 이렇게 해보면 어떨까요?")
        );
    }

    #[test]
    fn discards_text_before_first_heading() {
        let sections = ReportSections::parse(Some(REPORT));
        assert!(sections.get("마음 성장 리포트 쑥쑥 🌱").is_none());
        assert!(sections.get("소개 문장").is_none());
    }

    #[test]
    fn none_or_empty_input_has_no_sections() {
        assert!(ReportSections::parse(None).is_empty());
        assert!(ReportSections::parse(Some("")).is_empty());
        assert!(ReportSections::parse(Some("제목 없는 글")).is_empty());
    }

    #[test]
    fn missing_sections_are_omitted_from_blocks() {
        let sections = ReportSections::parse(Some("## 성장을 위한 제안 ✨\n힘내요!"));
        assert_eq!(sections.section(ReportSectionKind::EmotionAnalysis), None);

        let blocks = sections.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, ReportSectionKind::GrowthSuggestions);
        assert_eq!(blocks[0].title, "성장을 위한 제안");
        assert_eq!(blocks[0].body, "힘내요!");
    }

    #[test]
    fn empty_body_is_parsed_but_not_rendered() {
        let sections = ReportSections::parse(Some("## 감정 탐험하기 🎨\n   \n"));
        assert_eq!(sections.section(ReportSectionKind::EmotionAnalysis), Some(""));
        assert!(sections.blocks().is_empty());
    }

    #[test]
    fn later_duplicate_title_wins() {
        let sections = ReportSections::parse(Some("## A\n첫째\n## A\n둘째"));
        assert_eq!(sections.get("A"), Some("둘째"));
    }

    #[test]
    fn blocks_follow_render_order() {
        let text = "## 성장을 위한 제안 ✨\nc\n## 감정 탐험하기 🎨\na\n## 생각과 행동의 힘 💪\nb";
        let kinds: Vec<_> = ReportSections::parse(Some(text))
            .blocks()
            .into_iter()
            .map(|b| b.kind)
            .collect();
        assert_eq!(kinds, ReportSectionKind::ALL.to_vec());
    }
}

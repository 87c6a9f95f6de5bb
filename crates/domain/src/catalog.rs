//! Hand-authored scenarios used whenever generation fails.

use crate::scenario::{EmotionOption, ResponseOption, Scenario};

/// Number of distinct scenarios in the fallback catalog.
pub const FALLBACK_CATALOG_SIZE: usize = 3;

/// The first `count` fallback scenarios.
///
/// Requests larger than the catalog cycle through it, so callers always get
/// exactly `count` entries.
pub fn fallback_scenarios(count: usize) -> Vec<Scenario> {
    let catalog = catalog();
    catalog.iter().cycle().take(count).cloned().collect()
}

fn emotion(id: &str, text: &str, emoji: &str) -> EmotionOption {
    EmotionOption {
        id: id.to_string(),
        text: text.to_string(),
        emoji: emoji.to_string(),
    }
}

fn response(id: &str, text: &str, is_correct: bool, feedback: &str) -> ResponseOption {
    ResponseOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
        feedback: feedback.to_string(),
    }
}

fn catalog() -> [Scenario; FALLBACK_CATALOG_SIZE] {
    [
        Scenario {
            scenario: "온라인 단체 채팅방에서 친구들이 나만 빼고 다른 주제로 신나게 이야기하고 있어요. 왠지 나만 소외되는 기분이 들어요.".to_string(),
            emotions: vec![
                emotion("e1-1", "외로움", "😔"),
                emotion("e1-2", "서운함", "😞"),
                emotion("e1-3", "궁금함", "🤔"),
                emotion("e1-4", "아무렇지 않음", "😐"),
            ],
            responses: vec![
                response(
                    "r1-1",
                    "말 없이 채팅방을 나가버린다.",
                    false,
                    "마음이 상해서 나가고 싶을 수 있어요. 하지만 그러면 친구들이 오해할 수 있으니, 내 마음을 표현하는 다른 방법은 어떨까요?",
                ),
                response(
                    "r1-2",
                    "대화에 참여하고 싶다는 이모티콘을 보낸다.",
                    true,
                    "좋은 방법이에요! 대화의 흐름을 방해하지 않으면서 자연스럽게 관심을 표현할 수 있어요.",
                ),
                response(
                    "r1-3",
                    "나만 빼고 이야기하냐며 화를 낸다.",
                    false,
                    "속상한 마음은 이해하지만, 화를 내면 친구들도 당황할 거예요. 잠시 마음을 가라앉히고 이야기하는 게 좋아요.",
                ),
            ],
        },
        Scenario {
            scenario: "친구가 내가 열심히 만든 발표 자료를 보고 '이것보다 더 잘 만들 수 있었을 텐데'라고 말했어요.".to_string(),
            emotions: vec![
                emotion("e2-1", "속상함", "😢"),
                emotion("e2-2", "화남", "😠"),
                emotion("e2-3", "부끄러움", "😳"),
                emotion("e2-4", "의욕 상실", "😩"),
            ],
            responses: vec![
                response(
                    "r2-1",
                    "'너는 얼마나 잘했는지 보자'며 비꼰다.",
                    false,
                    "마음이 상해서 똑같이 쏘아붙이고 싶을 수 있어요. 하지만 잠시 감정을 가라앉히고 이야기하면 더 좋은 결과를 만들 수 있답니다.",
                ),
                response(
                    "r2-2",
                    "아무 말도 못 하고 자리를 피한다.",
                    false,
                    "속상한 마음을 표현하지 않으면 친구는 자신의 말이 어떻게 들렸는지 알 수 없어요. 용기를 내어보는 건 어떨까요?",
                ),
                response(
                    "r2-3",
                    "내 기분이 속상하다고 솔직하게 말한다.",
                    true,
                    "좋은 방법이에요! 자신의 감정을 솔직하고 차분하게 전달하는 것은 관계를 건강하게 만드는 중요한 첫걸음이에요.",
                ),
            ],
        },
        Scenario {
            scenario: "체육 시간에 팀을 나누어 경기를 하는데, 내가 실수해서 우리 팀이 졌어요. 팀원 몇몇이 나를 탓하는 눈치예요.".to_string(),
            emotions: vec![
                emotion("e3-1", "미안함", "😥"),
                emotion("e3-2", "억울함", "😤"),
                emotion("e3-3", "슬픔", "😭"),
                emotion("e3-4", "창피함", "😳"),
            ],
            responses: vec![
                response(
                    "r3-1",
                    "팀원들에게 먼저 미안하다고 사과한다.",
                    true,
                    "훌륭한 태도예요! 자신의 실수를 인정하고 먼저 사과하는 모습은 정말 멋지고 팀을 더 단단하게 만들어요.",
                ),
                response(
                    "r3-2",
                    "나 때문이 아니라고 다른 사람 탓을 한다.",
                    false,
                    "다른 사람 탓을 하면 팀워크가 깨지고 갈등이 더 커질 수 있어요. 먼저 책임지는 모습을 보여주는 게 중요해요.",
                ),
                response(
                    "r3-3",
                    "아무 말 없이 혼자 멀리 가 있는다.",
                    false,
                    "속상해서 혼자 있고 싶을 수 있지만, 그러면 팀원들과 오해가 풀리지 않아요. 함께 이야기하는 용기가 필요해요.",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_prefix_of_catalog() {
        let scenarios = fallback_scenarios(2);
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].emotions[0].id, "e1-1");
        assert_eq!(scenarios[1].emotions[0].id, "e2-1");
    }

    #[test]
    fn cycles_when_more_than_catalog_requested() {
        let scenarios = fallback_scenarios(FALLBACK_CATALOG_SIZE + 2);
        assert_eq!(scenarios.len(), 5);
        assert_eq!(scenarios[3], scenarios[0]);
        assert_eq!(scenarios[4], scenarios[1]);
    }

    #[test]
    fn zero_request_is_empty() {
        assert!(fallback_scenarios(0).is_empty());
    }

    #[test]
    fn each_scenario_has_exactly_one_recommended_response() {
        for scenario in fallback_scenarios(FALLBACK_CATALOG_SIZE) {
            let correct = scenario.responses.iter().filter(|r| r.is_correct).count();
            assert_eq!(correct, 1, "{}", scenario.scenario);
        }
    }
}

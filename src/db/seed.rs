use crate::models::NewQuote;

// (korean, english, author, era)
const SEED: &[(&str, &str, &str, &str)] = &[
    (
        "천 리 길도 한 걸음부터 시작된다.",
        "A journey of a thousand miles begins with a single step.",
        "Lao Tzu",
        "Ancient China",
    ),
    (
        "우리가 반복하는 행동이 곧 우리 자신이다.",
        "We are what we repeatedly do.",
        "Will Durant",
        "20th century",
    ),
    (
        "아침에 일어나면 살아 있다는 것이 얼마나 소중한 특권인지 생각하라.",
        "When you arise in the morning, think of what a precious privilege it is to be alive.",
        "Marcus Aurelius",
        "Ancient Rome",
    ),
    (
        "시작이 반이다.",
        "Well begun is half done.",
        "Aristotle",
        "Ancient Greece",
    ),
    (
        "오늘 할 수 있는 일을 내일로 미루지 마라.",
        "Never put off till tomorrow what you can do today.",
        "Thomas Jefferson",
        "18th century",
    ),
    (
        "행운은 준비된 마음을 좋아한다.",
        "Chance favors the prepared mind.",
        "Louis Pasteur",
        "19th century",
    ),
    (
        "우리를 괴롭히는 것은 일 자체가 아니라 일에 대한 생각이다.",
        "Men are disturbed not by things, but by the views which they take of them.",
        "Epictetus",
        "Ancient Rome",
    ),
    (
        "하루하루를 마지막 날처럼 살아라.",
        "Live each day as if it were your last.",
        "Seneca",
        "Ancient Rome",
    ),
    (
        "작은 일에 충실한 사람이 큰 일에도 충실하다.",
        "Whoever is faithful in small things will be faithful in large ones.",
        "Proverb",
        "Ancient",
    ),
    (
        "가장 큰 영광은 넘어지지 않는 것이 아니라 넘어질 때마다 일어서는 것이다.",
        "Our greatest glory is not in never falling, but in rising every time we fall.",
        "Oliver Goldsmith",
        "18th century",
    ),
    (
        "배움에는 끝이 없다.",
        "There is no end to learning.",
        "Confucius",
        "Ancient China",
    ),
    (
        "천천히 가는 것을 두려워 말고, 멈추는 것을 두려워하라.",
        "Be not afraid of growing slowly, be afraid only of standing still.",
        "Chinese proverb",
        "Ancient China",
    ),
    (
        "아는 것을 안다 하고 모르는 것을 모른다 하는 것이 참된 앎이다.",
        "To know what you know and what you do not know, that is true knowledge.",
        "Confucius",
        "Ancient China",
    ),
    (
        "멈추지 않는 한 얼마나 천천히 가는지는 중요하지 않다.",
        "It does not matter how slowly you go as long as you do not stop.",
        "Confucius",
        "Ancient China",
    ),
    (
        "자신을 아는 것이 모든 지혜의 시작이다.",
        "Knowing yourself is the beginning of all wisdom.",
        "Aristotle",
        "Ancient Greece",
    ),
    (
        "검토하지 않는 삶은 살 가치가 없다.",
        "The unexamined life is not worth living.",
        "Socrates",
        "Ancient Greece",
    ),
    (
        "변하지 않는 것은 변화뿐이다.",
        "The only constant in life is change.",
        "Heraclitus",
        "Ancient Greece",
    ),
    (
        "같은 강물에 두 번 발을 담글 수 없다.",
        "No man ever steps in the same river twice.",
        "Heraclitus",
        "Ancient Greece",
    ),
    (
        "인내는 쓰지만 그 열매는 달다.",
        "Patience is bitter, but its fruit is sweet.",
        "Jean-Jacques Rousseau",
        "18th century",
    ),
    (
        "행복은 우리 자신에게 달려 있다.",
        "Happiness depends upon ourselves.",
        "Aristotle",
        "Ancient Greece",
    ),
    (
        "당신의 삶은 당신의 생각이 만드는 것이다.",
        "Our life is what our thoughts make it.",
        "Marcus Aurelius",
        "Ancient Rome",
    ),
    (
        "아침의 한 시간은 저녁의 두 시간과 같다.",
        "An hour in the morning is worth two in the evening.",
        "Proverb",
        "Traditional",
    ),
    (
        "일찍 자고 일찍 일어나면 건강하고 부유하고 지혜로워진다.",
        "Early to bed and early to rise makes a man healthy, wealthy, and wise.",
        "Benjamin Franklin",
        "18th century",
    ),
    (
        "잃어버린 시간은 다시 찾을 수 없다.",
        "Lost time is never found again.",
        "Benjamin Franklin",
        "18th century",
    ),
    (
        "잘한 것이 잘 말한 것보다 낫다.",
        "Well done is better than well said.",
        "Benjamin Franklin",
        "18th century",
    ),
    (
        "삶이 있는 한 희망은 있다.",
        "While there is life, there is hope.",
        "Cicero",
        "Ancient Rome",
    ),
    (
        "감사는 가장 큰 미덕일 뿐 아니라 모든 미덕의 어머니다.",
        "Gratitude is not only the greatest of virtues, but the parent of all the others.",
        "Cicero",
        "Ancient Rome",
    ),
    (
        "노동이 몸을 단련하듯 어려움은 마음을 단련한다.",
        "Difficulties strengthen the mind, as labor does the body.",
        "Seneca",
        "Ancient Rome",
    ),
    (
        "우리는 현실보다 상상 속에서 더 자주 고통받는다.",
        "We suffer more often in imagination than in reality.",
        "Seneca",
        "Ancient Rome",
    ),
    (
        "어디로 항해하는지 모르는 사람에게는 어떤 바람도 순풍이 아니다.",
        "If one does not know to which port one is sailing, no wind is favorable.",
        "Seneca",
        "Ancient Rome",
    ),
    (
        "먼저 자신이 무엇이 되고자 하는지 말하라. 그리고 해야 할 일을 하라.",
        "First say to yourself what you would be; and then do what you have to do.",
        "Epictetus",
        "Ancient Rome",
    ),
    (
        "부유함은 많은 것을 가지는 것이 아니라 적게 원하는 데 있다.",
        "Wealth consists not in having great possessions, but in having few wants.",
        "Epictetus",
        "Ancient Rome",
    ),
    (
        "매일 아침 우리는 다시 태어난다. 오늘 하는 일이 가장 중요하다.",
        "Each morning we are born again. What we do today is what matters most.",
        "Buddha",
        "Ancient India",
    ),
    (
        "건강은 가장 큰 선물이고, 만족은 가장 큰 재산이다.",
        "Health is the greatest gift, contentment the greatest wealth.",
        "Buddha",
        "Ancient India",
    ),
    (
        "물방울이 모여 항아리를 채운다.",
        "Drop by drop is the water pot filled.",
        "Buddha",
        "Ancient India",
    ),
    (
        "아는 자는 말하지 않고, 말하는 자는 알지 못한다.",
        "Those who know do not speak. Those who speak do not know.",
        "Lao Tzu",
        "Ancient China",
    ),
    (
        "자연은 서두르지 않지만 모든 것을 이룬다.",
        "Nature does not hurry, yet everything is accomplished.",
        "Lao Tzu",
        "Ancient China",
    ),
    (
        "남을 아는 자는 지혜롭고, 자신을 아는 자는 밝다.",
        "He who knows others is wise; he who knows himself is enlightened.",
        "Lao Tzu",
        "Ancient China",
    ),
    (
        "자기 자신을 믿어라.",
        "Trust thyself.",
        "Ralph Waldo Emerson",
        "19th century",
    ),
    (
        "모든 날을 한 해 중 최고의 날이라고 마음에 새겨라.",
        "Write it on your heart that every day is the best day in the year.",
        "Ralph Waldo Emerson",
        "19th century",
    ),
    (
        "꿈을 향해 자신 있게 나아가라.",
        "Go confidently in the direction of your dreams.",
        "Henry David Thoreau",
        "19th century",
    ),
    (
        "우리가 깨어 있는 날에만 새벽이 온다.",
        "Only that day dawns to which we are awake.",
        "Henry David Thoreau",
        "19th century",
    ),
    (
        "천재는 1%의 영감과 99%의 노력으로 이루어진다.",
        "Genius is one percent inspiration and ninety-nine percent perspiration.",
        "Thomas Edison",
        "19th century",
    ),
    (
        "나는 실패한 것이 아니다. 안 되는 방법 만 가지를 찾았을 뿐이다.",
        "I have not failed. I've just found ten thousand ways that won't work.",
        "Thomas Edison",
        "19th century",
    ),
    (
        "친절한 말은 짧고 하기 쉽지만 그 울림은 끝이 없다.",
        "Kind words can be short and easy to speak, but their echoes are truly endless.",
        "Mother Teresa",
        "20th century",
    ),
    (
        "행동은 모든 성공의 기본 열쇠다.",
        "Action is the foundational key to all success.",
        "Pablo Picasso",
        "20th century",
    ),
    (
        "할 수 있다고 믿는 사람이 결국 해낸다.",
        "They can because they think they can.",
        "Virgil",
        "Ancient Rome",
    ),
    (
        "시간은 흘러간다.",
        "Time flies.",
        "Virgil",
        "Ancient Rome",
    ),
    (
        "지식은 힘이다.",
        "Knowledge is power.",
        "Francis Bacon",
        "17th century",
    ),
    (
        "나는 생각한다, 고로 존재한다.",
        "I think, therefore I am.",
        "René Descartes",
        "17th century",
    ),
    (
        "작은 기회가 종종 큰 일의 시작이 된다.",
        "Small opportunities are often the beginning of great enterprises.",
        "Demosthenes",
        "Ancient Greece",
    ),
    (
        "뿌린 대로 거둔다.",
        "As you sow, so shall you reap.",
        "Proverb",
        "Traditional",
    ),
    (
        "웃음은 최고의 약이다.",
        "Laughter is the best medicine.",
        "Proverb",
        "Traditional",
    ),
    (
        "낙숫물이 댓돌을 뚫는다.",
        "Constant dripping wears away the stone.",
        "Ovid",
        "Ancient Rome",
    ),
];

pub fn seed_quotes() -> Vec<NewQuote> {
    SEED.iter()
        .map(|(ko, en, author, era)| NewQuote {
            text_ko: ko.to_string(),
            text_en: en.to_string(),
            author: author.to_string(),
            era: Some(era.to_string()),
            image_url: None,
            is_published: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::services::quotes::QUOTE_MILESTONE;

    #[test]
    fn test_bundled_set_reaches_milestone() {
        assert!(seed_quotes().len() >= QUOTE_MILESTONE as usize);
    }

    #[test]
    fn test_bundled_quotes_are_bilingual_and_distinct() {
        let quotes = seed_quotes();
        let texts: HashSet<&str> = quotes.iter().map(|q| q.text_en.as_str()).collect();
        assert_eq!(texts.len(), quotes.len());
        assert!(quotes
            .iter()
            .all(|q| !q.text_ko.is_empty() && !q.text_en.is_empty() && !q.author.is_empty()));
    }
}

//! Fixed lookup tables used by the field rules.
//!
//! Kept as plain data so rules can be extended without touching the parsing
//! code. Order matters wherever a slice is scanned front to back.

/// A brand-name pattern and the canonical maker label it resolves to.
#[derive(Debug, Clone, Copy)]
pub struct MakerRule {
    /// Case-insensitive regular expression.
    pub pattern: &'static str,
    /// Canonical label written to the record.
    pub label: &'static str,
}

const fn rule(pattern: &'static str, label: &'static str) -> MakerRule {
    MakerRule { pattern, label }
}

/// Brand patterns in priority order. The first match wins.
pub const MAKER_RULES: &[MakerRule] = &[
    rule(r"KIA|기아", "기아"),
    rule(r"HYUNDAI|현대", "현대"),
    rule(r"CHEVROLET|쉐보레|GM\s*KOREA|지엠|GENERAL", "GM"),
    rule(r"MERCEDES|BENZ|메르세데스|벤츠|다임러", "메르세데스벤츠"),
    rule(r"\bBMW\b|BMW\s*AG|비엠더블유코리아", "BMW"),
    // Renault Korea was Renault Samsung.
    rule(r"RENAULT|르노|삼성", "르노"),
    rule(r"SSANGYONG|쌍용", "쌍용"),
    rule(r"GENESIS|제네시스", "제네시스"),
    rule(r"TOYOTA|토요타|도요타", "TOYOTA"),
    rule(r"\bLEXUS\b|렉서스", "LEXUS"),
    rule(r"랜드로버|재규어", "랜드로버"),
    rule(r"ROLLS|ROYCE|롤스로이스", "롤스로이스"),
    rule(r"MASERATI", "마세라티"),
    rule(r"볼보", "볼보"),
    rule(r"Audi|아우디|BENTLEY", "아우디"),
    rule(r"Automobili|Volkswagen", "폭스바겐"),
    rule(r"FCA|Chrysler", "크라이슬러"),
    rule(r"테슬라", "테슬라"),
    rule(r"FERRARI", "페라리"),
    rule(r"포드|FORD", "포드"),
    rule(r"포르쉐|Porsche", "포르쉐"),
    rule(r"CITROEN", "푸조"),
    rule(r"혼다", "혼다"),
];

/// World Manufacturer Identifier (first three VIN characters) to maker label.
pub const WMI_TABLE: &[(&str, &str)] = &[
    // Kia
    ("KNA", "기아"),
    ("KNB", "기아"),
    ("KNC", "기아"),
    ("KND", "기아"),
    ("KNE", "기아"),
    ("KNR", "기아"),
    ("KNT", "기아"),
    // Hyundai
    ("KMH", "현대"),
    ("KMF", "현대"),
    ("KMX", "현대"),
    ("5NP", "현대"),
    ("KMJ", "현대"),
    ("KMT", "현대"),
    // GM
    ("KLY", "GM"),
    ("KL1", "GM"),
    ("KL2", "GM"),
    ("KLA", "GM"),
    ("KL3", "GM"),
    ("KL4", "GM"),
    ("KL5", "GM"),
    ("1GN", "GM"),
    ("1GY", "GM"),
    ("1GC", "GM"),
    // Mercedes-Benz
    ("WDD", "메르세데스벤츠"),
    ("W1K", "메르세데스벤츠"),
    ("W1N", "메르세데스벤츠"),
    ("WDC", "메르세데스벤츠"),
    ("WDB", "메르세데스벤츠"),
    // BMW
    ("WBA", "BMW"),
    ("WBX", "BMW"),
    ("WBS", "BMW"),
    // Renault
    ("VF1", "르노"),
    ("KNM", "르노"),
    ("KPT", "쌍용"),
    // Lexus shares Toyota's codes.
    ("JTJ", "TOYOTA"),
    ("JTH", "TOYOTA"),
    ("JTM", "TOYOTA"),
    ("SCA", "롤스로이스"),
    ("SAL", "랜드로버"),
    ("ZAM", "마세라티"),
    ("ZN6", "마세라티"),
    ("1C4", "크라이슬러"),
    ("LVY", "볼보"),
    ("YV1", "볼보"),
    ("WAU", "아우디"),
    ("ZHW", "아우디"),
    ("SJA", "아우디"),
    ("5YJ", "테슬라"),
    ("ZFF", "페라리"),
    // Ford
    ("WF0", "포드"),
    ("1FA", "포드"),
    ("1FM", "포드"),
    ("2FA", "포드"),
    ("2FM", "포드"),
    ("WP0", "포르쉐"),
    // Volkswagen group
    ("ZPB", "폭스바겐"),
    ("WVW", "폭스바겐"),
    ("1VW", "폭스바겐"),
    ("WVG", "폭스바겐"),
    ("W0L", "폭스바겐"),
    ("3VW", "폭스바겐"),
    ("VF7", "푸조"),
    ("1HG", "혼다"),
    ("2HG", "혼다"),
    ("3HG", "혼다"),
    ("JNK", "닛산"),
    ("JNN", "닛산"),
    ("JA3", "미쓰비시"),
    ("JAL", "미쓰비시"),
    ("JM1", "마쓰다"),
];

/// Labels that precede a VIN.
pub const VIN_KEYWORDS: &[&str] = &["차대번호", "vin", "v.i.n"];

/// Labels that precede a manufacture date.
pub const YEAR_KEYWORDS: &[&str] = &[
    "제작년도",
    "제작연도",
    "제작연월",
    "연월",
    "년월",
    "제작월",
    "제작년월",
];

/// Labels that precede a model name. `차종` (vehicle class) is deliberately absent.
pub const MODEL_KEYWORDS: &[&str] = &["차명", "모델명"];

/// Labels the token heuristic measures distance from; includes the vehicle class.
pub const MODEL_ANCHOR_KEYWORDS: &[&str] = &["차명", "모델명", "차종"];

/// Regex fragments for sticker boilerplate that is never a model name:
/// weights, tyre data, axles, transmission, trim colours and the legal
/// conformity sentence.
pub const BANNED_MODEL_TERMS: &[&str] = &[
    "제작",
    "차량총중량",
    "타이어",
    "공기압",
    "림",
    "전축",
    "후축",
    "적차",
    "psi",
    "kg",
    "변속기",
    "차축비",
    "외장",
    "내장",
    r"이\s*자동차는",
    "대한민국",
    r"자동차\s*관리법령",
    "적합",
    "제작되었습니다",
];

/// Maker label for a WMI code.
pub fn wmi_maker(wmi: &str) -> Option<&'static str> {
    WMI_TABLE
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(wmi))
        .map(|(_, label)| *label)
}

//! Compiled-in character tables, in catalog order

/// (symbol, romanization)
pub type Entry = (&'static str, &'static str);

pub const HIRAGANA: &[Entry] = &[
    ("あ", "a"), ("い", "i"), ("う", "u"), ("え", "e"), ("お", "o"),
    ("か", "ka"), ("き", "ki"), ("く", "ku"), ("け", "ke"), ("こ", "ko"),
    ("さ", "sa"), ("し", "shi"), ("す", "su"), ("せ", "se"), ("そ", "so"),
    ("た", "ta"), ("ち", "chi"), ("つ", "tsu"), ("て", "te"), ("と", "to"),
    ("な", "na"), ("に", "ni"), ("ぬ", "nu"), ("ね", "ne"), ("の", "no"),
    ("は", "ha"), ("ひ", "hi"), ("ふ", "fu"), ("へ", "he"), ("ほ", "ho"),
    ("ま", "ma"), ("み", "mi"), ("む", "mu"), ("め", "me"), ("も", "mo"),
    ("や", "ya"), ("ゆ", "yu"), ("よ", "yo"),
    ("ら", "ra"), ("り", "ri"), ("る", "ru"), ("れ", "re"), ("ろ", "ro"),
    ("わ", "wa"), ("を", "wo"), ("ん", "n"),
];

pub const KATAKANA: &[Entry] = &[
    ("ア", "a"), ("イ", "i"), ("ウ", "u"), ("エ", "e"), ("オ", "o"),
    ("カ", "ka"), ("キ", "ki"), ("ク", "ku"), ("ケ", "ke"), ("コ", "ko"),
    ("サ", "sa"), ("シ", "shi"), ("ス", "su"), ("セ", "se"), ("ソ", "so"),
    ("タ", "ta"), ("チ", "chi"), ("ツ", "tsu"), ("テ", "te"), ("ト", "to"),
    ("ナ", "na"), ("ニ", "ni"), ("ヌ", "nu"), ("ネ", "ne"), ("ノ", "no"),
    ("ハ", "ha"), ("ヒ", "hi"), ("フ", "fu"), ("ヘ", "he"), ("ホ", "ho"),
    ("マ", "ma"), ("ミ", "mi"), ("ム", "mu"), ("メ", "me"), ("モ", "mo"),
    ("ヤ", "ya"), ("ユ", "yu"), ("ヨ", "yo"),
    ("ラ", "ra"), ("リ", "ri"), ("ル", "ru"), ("レ", "re"), ("ロ", "ro"),
    ("ワ", "wa"), ("ヲ", "wo"), ("ン", "n"),
];

// Ъ and Ь have no sound of their own; the accepted answer is their name.
pub const CYRILLIC: &[Entry] = &[
    ("А", "a"), ("Б", "b"), ("В", "v"), ("Г", "g"), ("Д", "d"),
    ("Е", "ye"), ("Ё", "yo"), ("Ж", "zh"), ("З", "z"), ("И", "i"),
    ("Й", "y"), ("К", "k"), ("Л", "l"), ("М", "m"), ("Н", "n"),
    ("О", "o"), ("П", "p"), ("Р", "r"), ("С", "s"), ("Т", "t"),
    ("У", "u"), ("Ф", "f"), ("Х", "kh"), ("Ц", "ts"), ("Ч", "ch"),
    ("Ш", "sh"), ("Щ", "shch"), ("Ъ", "hard sign"), ("Ы", "y"),
    ("Ь", "soft sign"), ("Э", "e"), ("Ю", "yu"), ("Я", "ya"),
];

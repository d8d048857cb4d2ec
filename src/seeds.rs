// File: src/seeds.rs
use crate::core::gematria::value;
use crate::core::normalizer::normalize;
use crate::core::types::GematriaValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Curated names, holidays and concepts shipped with the crate.
pub const CURATED_CONCEPTS: &[(&str, &str)] = &[
    // People
    ("אדם", "Adam"), ("חוה", "Eve"), ("קין", "Cain"), ("הבל", "Abel"),
    ("נח", "Noah"), ("אברהם", "Avraham"), ("שרה", "Sarah"), ("יצחק", "Yitzchak"),
    ("רבקה", "Rivka"), ("יעקב", "Yaakov"), ("רחל", "Rachel"), ("לאה", "Leah"),
    ("יוסף", "Yosef"), ("משה", "Moshe"), ("אהרן", "Aharon"), ("מרים", "Miriam"),
    ("דוד", "David"), ("שלמה", "Solomon"), ("שאול", "Saul"), ("שמואל", "Samuel"),
    ("אסתר", "Esther"), ("מרדכי", "Mordechai"), ("אליהו", "Eliyahu"),
    ("ראובן", "Reuven"), ("שמעון", "Shimon"), ("לוי", "Levi"), ("יהודה", "Yehuda"),
    ("יששכר", "Issachar"), ("זבולון", "Zevulun"), ("דן", "Dan"), ("נפתלי", "Naftali"),
    ("גד", "Gad"), ("אשר", "Asher"), ("בנימין", "Benjamin"), ("אפרים", "Ephraim"),
    ("מנשה", "Menashe"),
    // Holidays
    ("שבת", "Shabbat"), ("ראש השנה", "Rosh Hashanah"), ("יום כיפור", "Yom Kippur"),
    ("סוכות", "Sukkot"), ("שמחת תורה", "Simchat Torah"), ("חנוכה", "Chanukah"),
    ("פורים", "Purim"), ("פסח", "Pesach"), ("שבועות", "Shavuot"),
    ("ראש חודש", "Rosh Chodesh"), ("תשעה באב", "Tisha B'Av"), ("ל\"ג בעומר", "Lag BaOmer"),
    // Concepts
    ("תורה", "Torah"), ("מצוה", "Mitzvah"), ("צדקה", "Tzedakah"), ("תשובה", "Teshuva"),
    ("תפילה", "Tefillah"), ("חסד", "Chesed"), ("גבורה", "Gevurah"), ("תפארת", "Tiferet"),
    ("נצח", "Netzach"), ("הוד", "Hod"), ("יסוד", "Yesod"), ("מלכות", "Malchut"),
    ("כתר", "Keter"), ("חכמה", "Chochmah"), ("בינה", "Binah"), ("דעת", "Daat"),
    ("ישראל", "Yisrael"), ("ירושלים", "Jerusalem"), ("ציון", "Zion"),
    ("בית המקדש", "The Temple"), ("משיח", "Mashiach"), ("גן עדן", "Gan Eden"),
    ("גיהנום", "Gehinnom"), ("עולם הבא", "World to Come"), ("נשמה", "Soul"),
    ("רוח", "Spirit"), ("נפש", "Soul (Nefesh)"), ("שכינה", "Shechinah"),
    ("אמן", "Amen"), ("הללויה", "Hallelujah"), ("שמע", "Shema"), ("שלום", "Shalom"),
    ("מזל טוב", "Mazel Tov"), ("חיים", "Chaim (Life)"), ("אמת", "Emet (Truth)"),
    // Months
    ("תשרי", "Tishrei"), ("חשון", "Cheshvan"), ("כסלו", "Kislev"), ("טבת", "Tevet"),
    ("שבט", "Shevat"), ("אדר", "Adar"), ("ניסן", "Nisan"), ("אייר", "Iyar"),
    ("סיון", "Sivan"), ("תמוז", "Tammuz"), ("אב", "Av"), ("אלול", "Elul"),
    // Numbers and names of God
    ("אחד", "Echad (One)"), ("אהבה", "Ahava (Love)"), ("י-ה-ו-ה", "Hashem"), ("אלוהים", "Elohim"),
];

/// Display labels grouped by gematria value, e.g. `345 -> ["משה (Moshe)"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedList {
    entries: BTreeMap<GematriaValue, Vec<String>>,
}

impl SeedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curated() -> Self {
        Self::from_concepts(CURATED_CONCEPTS.iter().copied())
    }

    pub fn from_concepts<'a>(concepts: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut list = Self::new();
        for (he, en) in concepts {
            list.add_concept(he, en);
        }
        list
    }

    /// Adds "<he> (<en>)" under the value of `he`. Zero-valued or
    /// already-listed concepts are ignored.
    pub fn add_concept(&mut self, he: &str, en: &str) -> bool {
        let val = value(he);
        if val == 0 {
            return false;
        }
        let label = format!("{} ({})", he, en);
        let bucket = self.entries.entry(val).or_default();
        if bucket.contains(&label) {
            return false;
        }
        bucket.push(label);
        true
    }

    pub fn get(&self, val: GematriaValue) -> &[String] {
        self.entries.get(&val).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Words to race: the Hebrew part of every label, normalized, with
    /// inner spaces removed and at least `min_len` letters long.
    pub fn tracked_words(&self, min_len: usize) -> BTreeSet<String> {
        self.entries
            .values()
            .flatten()
            .filter_map(|label| tracked_word(label, min_len))
            .collect()
    }
}

/// Derives the racing form of one "<he> (<en>)" label.
pub fn tracked_word(label: &str, min_len: usize) -> Option<String> {
    let hebrew = label.split('(').next().unwrap_or("").trim();
    let word: String = normalize(hebrew).chars().filter(|c| !c.is_whitespace()).collect();
    (!word.is_empty() && word.chars().count() >= min_len).then_some(word)
}

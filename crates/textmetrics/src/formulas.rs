//! Readability formulas.
//!
//! Pure functions of counts, averages, and coefficient tuples. They never see
//! text, so they can be checked against published reference values
//! directly. Every formula returns `0.0` instead of dividing by zero or
//! producing a non-finite result.
//!
//! Averages fed to the grade formulas are expected pre-rounded the way
//! [`LocaleSession`](crate::engine::LocaleSession) rounds them: sentence
//! length and syllables per word to one decimal place, letters and
//! sentences per word to two.

// Fused multiply-add rounds differently and shifts reference scores by 0.01.
#![allow(clippy::suboptimal_flops)]

use crate::locale::{
    AriCoefficients, ColemanLiauCoefficients, DaleChallCoefficients, FleschCoefficients,
    FleschKincaidCoefficients, FogCoefficients, LinsearCoefficients, SmogCoefficients,
    SpacheCoefficients,
};

/// Round half away from zero to `places` decimals.
///
/// `2.675` rounds to `2.68` and `-1.25` to `-1.3`, unlike banker's rounding.
pub fn legacy_round(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(places as i32);
    let rounded = (value.abs() * factor + 0.5).floor() / factor;
    rounded.copysign(value)
}

/// `numerator / denominator`, or `0.0` for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `count / total`, or `0.0` for an empty total.
pub fn per(count: usize, total: usize) -> f64 {
    ratio(count as f64, total as f64)
}

fn finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Flesch Reading Ease. Higher is easier; English text lands in 0-100.
///
/// `asw` is syllables per word, or per `syllable_interval` words when the
/// table sets one.
pub fn flesch_reading_ease(asl: f64, asw: f64, c: &FleschCoefficients) -> f64 {
    if asl == 0.0 && asw == 0.0 {
        return 0.0;
    }
    legacy_round(
        c.base - c.sentence_length * asl - c.syllables_per_word * asw,
        2,
    )
}

/// Flesch-Kincaid grade level.
pub fn flesch_kincaid_grade(asl: f64, asw: f64, c: &FleschKincaidCoefficients) -> f64 {
    if asl == 0.0 && asw == 0.0 {
        return 0.0;
    }
    legacy_round(
        c.sentence_length * asl + c.syllables_per_word * asw - c.offset,
        1,
    )
}

/// Gunning Fog index.
pub fn gunning_fog(asl: f64, complex_words: usize, words: usize, c: &FogCoefficients) -> f64 {
    if words == 0 {
        return 0.0;
    }
    legacy_round(c.weight * (asl + 100.0 * per(complex_words, words)), 2)
}

/// SMOG grade. Zero without a sentence.
pub fn smog_index(polysyllables: usize, sentences: usize, c: &SmogCoefficients) -> f64 {
    if sentences < 1 {
        return 0.0;
    }
    let scaled = polysyllables as f64 * c.sample_sentences / sentences as f64;
    legacy_round(c.base + c.weight * scaled.sqrt(), 1)
}

/// Coleman-Liau index from letters per word and sentences per word.
pub fn coleman_liau_index(
    letters_per_word: f64,
    sentences_per_word: f64,
    c: &ColemanLiauCoefficients,
) -> f64 {
    if letters_per_word == 0.0 {
        return 0.0;
    }
    let letters = legacy_round(letters_per_word * 100.0, 2);
    let sentences = legacy_round(sentences_per_word * 100.0, 2);
    legacy_round(c.letters * letters - c.sentences * sentences - c.offset, 2)
}

/// Automated Readability Index from characters per word and words per
/// sentence.
pub fn automated_readability_index(
    chars_per_word: f64,
    words_per_sentence: f64,
    c: &AriCoefficients,
) -> f64 {
    if chars_per_word == 0.0 {
        return 0.0;
    }
    legacy_round(
        c.characters * chars_per_word + c.words * words_per_sentence - c.offset,
        1,
    )
}

/// Linsear Write over a word sample: `easy` words weigh 1, `hard` words 3.
pub fn linsear_write(easy: usize, hard: usize, sentences: usize, c: &LinsearCoefficients) -> f64 {
    if sentences == 0 {
        return 0.0;
    }
    let raw = (easy as f64 + 3.0 * hard as f64) / sentences as f64;
    let score = if raw > c.threshold {
        raw / 2.0
    } else {
        (raw - c.adjustment) / 2.0
    };
    legacy_round(score, 2)
}

/// Dale-Chall score from the difficult-word percentage and rounded average
/// sentence length.
pub fn dale_chall(percent_difficult: f64, asl: f64, c: &DaleChallCoefficients) -> f64 {
    if asl == 0.0 {
        return 0.0;
    }
    let mut score = c.difficult * percent_difficult + c.sentence_length * asl;
    if percent_difficult > c.threshold {
        score += c.adjustment;
    }
    legacy_round(score, 2)
}

/// Dale-Chall, second variant: unrounded sentence length, adjustment keyed
/// on the difficult-word fraction.
pub fn dale_chall_v2(percent_difficult: f64, asl: f64, c: &DaleChallCoefficients) -> f64 {
    if asl == 0.0 {
        return 0.0;
    }
    let mut score = c.difficult * percent_difficult + c.sentence_length * asl;
    if percent_difficult / 100.0 > c.v2_threshold {
        score += c.adjustment;
    }
    legacy_round(score, 2)
}

/// Spache score from sentence length and the unfamiliar-word percentage.
pub fn spache(asl: f64, percent_unfamiliar: f64, c: &SpacheCoefficients) -> f64 {
    if asl == 0.0 {
        return 0.0;
    }
    legacy_round(
        c.sentence_length * asl + c.unfamiliar * percent_unfamiliar + c.offset,
        2,
    )
}

/// Läsbarhetsindex: sentence length plus the long-word percentage.
pub fn lix(asl: f64, long_words: usize, words: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    legacy_round(asl + 100.0 * per(long_words, words), 2)
}

/// Rate Index: long words per sentence.
pub fn rix(long_words: usize, sentences: usize) -> f64 {
    legacy_round(per(long_words, sentences), 2)
}

/// Seconds to read `chars` non-space characters.
pub fn reading_time(chars: usize, ms_per_char: f64) -> f64 {
    legacy_round(finite(chars as f64 * ms_per_char / 1000.0), 2)
}

/// Fernández Huerta (Spanish reading ease).
pub fn fernandez_huerta(asw: f64, asl: f64) -> f64 {
    if asw == 0.0 && asl == 0.0 {
        return 0.0;
    }
    legacy_round(206.84 - 60.0 * asw - 1.02 * asl, 2)
}

/// Szigriszt-Pazos perspicuity (Spanish).
pub fn szigriszt_pazos(syllables: usize, words: usize, sentences: usize) -> f64 {
    if words == 0 || sentences == 0 {
        return 0.0;
    }
    legacy_round(
        206.835 - 62.3 * per(syllables, words) - per(words, sentences),
        2,
    )
}

/// Gutiérrez de Polini comprehensibility (Spanish).
pub fn gutierrez_polini(letters: usize, words: usize, sentences: usize) -> f64 {
    if words == 0 || sentences == 0 {
        return 0.0;
    }
    legacy_round(
        95.2 - 9.7 * per(letters, words) - 0.35 * per(words, sentences),
        2,
    )
}

/// Crawford years of schooling (Spanish).
pub fn crawford(sentences: usize, words: usize, syllables: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    let sentences_per_100 = 100.0 * per(sentences, words);
    let syllables_per_100 = 100.0 * per(syllables, words);
    legacy_round(
        -0.205 * sentences_per_100 + 0.049 * syllables_per_100 - 3.407,
        1,
    )
}

/// Gulpease index (Italian), 0-100.
pub fn gulpease_index(sentences: usize, words: usize, chars: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    legacy_round(
        89.0 + 300.0 * per(sentences, words) - 10.0 * per(chars, words),
        1,
    )
}

/// Inputs to the Wiener Sachtextformel, all percentages except `sl`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SachtextInputs {
    /// Percentage of words with three or more syllables.
    pub ms: f64,
    /// Average sentence length in words.
    pub sl: f64,
    /// Percentage of words longer than six characters.
    pub iw: f64,
    /// Percentage of one-syllable words.
    pub es: f64,
}

/// Wiener Sachtextformel (German school grade). Variants 1 through 4;
/// any other variant scores `0.0`.
pub fn wiener_sachtextformel(variant: u8, x: SachtextInputs) -> f64 {
    let score = match variant {
        1 => 0.1935 * x.ms + 0.1672 * x.sl + 0.1297 * x.iw - 0.0327 * x.es - 0.875,
        2 => 0.2007 * x.ms + 0.1682 * x.sl + 0.1373 * x.iw - 2.779,
        3 => 0.2963 * x.ms + 0.1905 * x.sl - 1.1144,
        4 => 0.2744 * x.ms + 0.2656 * x.sl - 1.693,
        _ => return 0.0,
    };
    legacy_round(score, 1)
}

/// McAlpine EFLAW (English as a foreign language).
pub fn mcalpine_eflaw(words: usize, miniwords: usize, sentences: usize) -> f64 {
    legacy_round(per(words + miniwords, sentences), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counts of a 16-sentence, 372-word reference paragraph.
    const SENTENCES: usize = 16;
    const WORDS: usize = 372;
    const RAW_WORDS: usize = 376;
    const SYLLABLES: usize = 521;
    const LETTERS: usize = 1688;
    const CHARS: usize = 1748;
    const POLYSYLLABLES: usize = 32;
    const DIFFICULT: usize = 49;
    const COMPLEX: usize = 18;
    const LONG_WORDS: usize = 82;

    fn asl() -> f64 {
        legacy_round(per(WORDS, SENTENCES), 1)
    }

    fn asw() -> f64 {
        legacy_round(per(SYLLABLES, WORDS), 1)
    }

    fn percent_difficult() -> f64 {
        100.0 * per(DIFFICULT, WORDS)
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(legacy_round(2.675, 2), 2.68);
        assert_eq!(legacy_round(0.5, 0), 1.0);
        assert_eq!(legacy_round(-1.25, 1), -1.3);
        assert_eq!(legacy_round(5.125, 2), 5.13);
        assert_eq!(legacy_round(f64::NAN, 2), 0.0);
    }

    #[test]
    fn reference_averages() {
        assert_eq!(asl(), 23.3);
        assert_eq!(asw(), 1.4);
        assert_eq!(legacy_round(per(LETTERS, WORDS), 2), 4.54);
        assert_eq!(legacy_round(per(SENTENCES, WORDS), 2), 0.04);
    }

    #[test]
    fn flesch_reading_ease_english() {
        let score = flesch_reading_ease(asl(), asw(), &FleschCoefficients::default());
        assert_eq!(score, 64.75);
    }

    #[test]
    fn flesch_reading_ease_other_tables() {
        let table = |base, sentence_length, syllables_per_word| FleschCoefficients {
            base,
            sentence_length,
            syllables_per_word,
            syllable_interval: None,
        };
        // Syllable averages as each language's vowel set counts them.
        assert_eq!(flesch_reading_ease(23.3, 1.6, &table(180.0, 1.0, 58.5)), 63.1);
        assert_eq!(flesch_reading_ease(23.3, 1.4, &table(207.0, 1.015, 73.6)), 80.31);
        assert_eq!(flesch_reading_ease(23.3, 1.6, &table(206.835, 0.93, 77.0)), 61.97);
        assert_eq!(flesch_reading_ease(23.3, 1.0, &table(206.835, 1.3, 60.1)), 116.45);
        assert_eq!(flesch_reading_ease(23.3, 164.5, &table(206.84, 1.02, 0.6)), 84.37);
        assert_eq!(flesch_reading_ease(23.3, 162.4, &table(217.0, 1.3, 0.6)), 89.27);
    }

    #[test]
    fn flesch_kincaid() {
        let grade = flesch_kincaid_grade(asl(), asw(), &FleschKincaidCoefficients::default());
        assert_eq!(grade, 10.0);
    }

    #[test]
    fn fog_english_and_polish() {
        let english = FogCoefficients::default();
        assert_eq!(gunning_fog(asl(), COMPLEX, WORDS, &english), 11.26);
        // Polish counts four-syllable words, of which there are fewer
        assert_eq!(gunning_fog(asl(), 10, WORDS, &english), 10.4);
    }

    #[test]
    fn smog() {
        let c = SmogCoefficients::default();
        assert_eq!(smog_index(POLYSYLLABLES, SENTENCES, &c), 11.2);
        assert_eq!(smog_index(POLYSYLLABLES, 0, &c), 0.0);
    }

    #[test]
    fn coleman_liau() {
        let lpw = legacy_round(per(LETTERS, WORDS), 2);
        let spw = legacy_round(per(SENTENCES, WORDS), 2);
        let index = coleman_liau_index(lpw, spw, &ColemanLiauCoefficients::default());
        assert_eq!(index, 9.35);
    }

    #[test]
    fn ari() {
        let cpw = legacy_round(per(CHARS, WORDS), 2);
        let wps = legacy_round(per(WORDS, SENTENCES), 2);
        let index = automated_readability_index(cpw, wps, &AriCoefficients::default());
        assert_eq!(index, 12.3);
    }

    #[test]
    fn linsear_threshold_rule() {
        let c = LinsearCoefficients::default();
        // 58 words over 2 sentences: raw 29, above the threshold
        assert_eq!(linsear_write(43, 5, 2, &c), 14.5);
        // raw 7: (7 - 2) / 2
        assert_eq!(linsear_write(4, 1, 1, &c), 2.5);
        assert_eq!(linsear_write(4, 1, 0, &c), 0.0);
    }

    #[test]
    fn dale_chall_variants() {
        let c = DaleChallCoefficients::default();
        assert_eq!(dale_chall(percent_difficult(), asl(), &c), 6.87);
        assert_eq!(
            dale_chall_v2(percent_difficult(), per(WORDS, SENTENCES), &c),
            6.87
        );
        // No adjustment below the threshold
        assert_eq!(dale_chall(4.0, 10.0, &c), 1.13);
        assert_eq!(dale_chall_v2(4.0, 10.0, &c), 1.13);
    }

    #[test]
    fn spache_score() {
        let c = SpacheCoefficients::default();
        assert_eq!(spache(asl(), percent_difficult(), &c), 5.26);
        assert_eq!(spache(5.0, 20.0, &c), 3.26);
    }

    #[test]
    fn lix_and_rix() {
        assert_eq!(lix(asl(), LONG_WORDS, RAW_WORDS), 45.11);
        assert_eq!(rix(LONG_WORDS, SENTENCES), 5.13);
    }

    #[test]
    fn reading_time_is_linear_in_characters() {
        assert_eq!(reading_time(CHARS, 14.69), 25.68);
        assert_eq!(reading_time(0, 14.69), 0.0);
        assert_eq!(reading_time(100, 10.0), 1.0);
    }

    #[test]
    fn spanish_and_italian_supplements() {
        assert_eq!(fernandez_huerta(1.4, 23.3), 99.07);
        assert_eq!(szigriszt_pazos(SYLLABLES, WORDS, SENTENCES), 96.33);
        assert_eq!(gutierrez_polini(LETTERS, WORDS, SENTENCES), 43.05);
        assert_eq!(crawford(SENTENCES, WORDS, SYLLABLES), 2.6);
        assert_eq!(gulpease_index(SENTENCES, WORDS, CHARS), 54.9);
    }

    #[test]
    fn sachtextformel_variants() {
        let x = SachtextInputs {
            ms: 20.0,
            sl: 15.0,
            iw: 25.0,
            es: 50.0,
        };
        assert_eq!(wiener_sachtextformel(1, x), 7.1);
        assert_eq!(wiener_sachtextformel(2, x), 7.2);
        assert_eq!(wiener_sachtextformel(3, x), 7.7);
        assert_eq!(wiener_sachtextformel(4, x), 7.8);
        assert_eq!(wiener_sachtextformel(5, x), 0.0);
    }

    #[test]
    fn mcalpine() {
        assert_eq!(mcalpine_eflaw(20, 8, 2), 14.0);
        assert_eq!(mcalpine_eflaw(20, 8, 0), 0.0);
    }

    #[test]
    fn degenerate_input_scores_zero() {
        assert_eq!(flesch_reading_ease(0.0, 0.0, &FleschCoefficients::default()), 0.0);
        assert_eq!(flesch_kincaid_grade(0.0, 0.0, &FleschKincaidCoefficients::default()), 0.0);
        assert_eq!(gunning_fog(0.0, 0, 0, &FogCoefficients::default()), 0.0);
        assert_eq!(coleman_liau_index(0.0, 0.0, &ColemanLiauCoefficients::default()), 0.0);
        assert_eq!(automated_readability_index(0.0, 0.0, &AriCoefficients::default()), 0.0);
        assert_eq!(dale_chall(0.0, 0.0, &DaleChallCoefficients::default()), 0.0);
        assert_eq!(spache(0.0, 0.0, &SpacheCoefficients::default()), 0.0);
        assert_eq!(lix(0.0, 0, 0), 0.0);
        assert_eq!(rix(3, 0), 0.0);
        assert_eq!(gulpease_index(0, 0, 0), 0.0);
    }
}

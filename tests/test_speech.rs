//! Tests for [`cork_sommelier::speech`]

use cork_sommelier::speech::{clean_reply, escape_ssml, split_sentences, to_ssml};

/// Test 1: a typical list-style reply becomes speakable prose.
#[test]
fn test_clean_reply_flattens_list() {
    let reply = "Great choices tonight:\n\n1. Malbec,, bold and smoky\n2. Pinot Noir , , light\n- Rosé";
    let cleaned = clean_reply(reply);
    assert!(!cleaned.contains("1."), "numbered bullets should be stripped: {cleaned}");
    assert!(!cleaned.contains(",,"), "double commas should collapse: {cleaned}");
    assert!(cleaned.contains("Malbec, bold and smoky"));
    assert!(cleaned.contains("Pinot Noir , light"));
    assert!(cleaned.ends_with("Rosé"));
}

/// Test 2: indented bullets and bullets with `)` are stripped too.
#[test]
fn test_clean_reply_indented_bullets() {
    assert_eq!(clean_reply("   3) Champagne"), "Champagne");
}

/// Test 3: a year at the start of a line without trailing space is kept.
#[test]
fn test_clean_reply_keeps_vintages() {
    assert_eq!(clean_reply("2019 was a great year."), "2019 was a great year.");
}

/// Test 4: text without terminators is one sentence.
#[test]
fn test_split_without_terminator() {
    assert_eq!(split_sentences("just one thought"), vec!["just one thought"]);
}

/// Test 5: newlines count as whitespace after a terminator.
#[test]
fn test_split_across_newlines() {
    assert_eq!(
        split_sentences("Cheers!\nSee you soon."),
        vec!["Cheers!", "See you soon."]
    );
}

/// Test 6: decimals do not split sentences.
#[test]
fn test_split_keeps_decimals() {
    assert_eq!(split_sentences("It is 13.5% abv. Enjoy"), vec!["It is 13.5% abv.", "Enjoy"]);
}

/// Test 7: all five XML specials are escaped.
#[test]
fn test_escape_ssml() {
    assert_eq!(escape_ssml(r#"<a & 'b' "c">"#), "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;");
}

/// Test 8: SSML structure with the configured pause.
#[test]
fn test_to_ssml_structure() {
    let ssml = to_ssml("Try the Malbec. It pairs with steak! Want more?", 400);
    assert!(ssml.starts_with("<speak>"));
    assert!(ssml.ends_with("</speak>"));
    assert_eq!(ssml.matches("<break time=\"400ms\"/>").count(), 2);
}

/// Test 9: a zero pause joins sentences with a space.
#[test]
fn test_to_ssml_zero_break() {
    assert_eq!(to_ssml("One. Two.", 0), "<speak>One. Two.</speak>");
}

/// Test 10: comma runs without surrounding spaces still read as a pause.
#[test]
fn test_clean_reply_separates_collapsed_commas() {
    assert_eq!(clean_reply("Notes of oak,,vanilla,,,cherry"), "Notes of oak, vanilla, cherry");
}

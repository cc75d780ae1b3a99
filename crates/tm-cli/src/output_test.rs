use super::*;

#[test]
fn test_plain_style_leaves_text_untouched() {
    let style = OutputStyle::new(false);
    assert!(!style.color);
    assert_eq!(style.heading("Plan"), "Plan");
    assert_eq!(style.success("Done."), "Done.");
    assert_eq!(style.warning("skipped"), "skipped");
    assert_eq!(style.error("error:"), "error:");
    assert_eq!(style.version("20090212112104"), "20090212112104");
    assert_eq!(style.sql("create table spam (id int)"), "create table spam (id int)");
}

#[test]
fn test_colored_style_keeps_text() {
    // Escape codes depend on the terminal, the text itself must survive.
    let style = OutputStyle::new(true);
    assert!(style.color);
    assert!(style.success("Done.").contains("Done."));
    assert!(style.error("error:").contains("error:"));
}

//! Page scripts executed inside the stroke page.
//!
//! Each script is a function body run by the driver, so every one `return`s.

/// True once the page has built its writer and flagged itself ready.
pub const READY: &str =
    "return window.writer !== undefined && window.animationReady === true;";

/// Flags the animation as started and runs it, recording progress on `window`.
pub const START_ANIMATION: &str = r#"
if (window.writer) {
    window.animationStarted = true;
    window.writer.animateCharacter({
        onProgress: function (progress) { window.animationProgress = progress; }
    });
    return true;
}
return false;
"#;

/// Selector of the SVG the drawing engine renders into.
///
/// The page also carries a background grid SVG, so a bare `svg` selector
/// would match the wrong element.
pub const STROKE_SVG_SELECTOR: &str = "#target svg";

/// True when any path of the stroke SVG has a dash pattern or a non-`none` stroke.
pub const STROKES_VISIBLE: &str = r#"
var svg = document.querySelector('#target svg');
if (!svg) { return false; }
var paths = svg.querySelectorAll('path');
for (var i = 0; i < paths.length; i++) {
    var dash = window.getComputedStyle(paths[i]).strokeDasharray;
    if (dash && dash !== 'none' && dash !== '0px') { return true; }
    var stroke = paths[i].getAttribute('stroke');
    if (stroke && stroke !== 'none') { return true; }
}
return false;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_return_values() {
        for script in [READY, START_ANIMATION, STROKES_VISIBLE] {
            assert!(script.contains("return"));
        }
    }

    const STROKE_PAGE: &str = include_str!("../../../../assets/stroke.html");

    #[test]
    fn test_strokes_visible_targets_engine_svg() {
        assert!(STROKES_VISIBLE.contains(&format!("querySelector('{}')", STROKE_SVG_SELECTOR)));
        assert!(!STROKES_VISIBLE.contains("querySelector('svg')"));
    }

    #[test]
    fn test_stroke_page_provides_script_hooks() {
        // The engine mounts into #target; the grid SVG must not be inside it
        assert!(STROKE_PAGE.contains(r#"<div id="target"></div>"#));
        assert!(STROKE_PAGE.contains("HanziWriter.create('target'"));
        assert!(STROKE_PAGE.contains("window.writer = HanziWriter.create("));
        assert!(STROKE_PAGE.contains("window.animationReady = true"));
        assert!(STROKE_PAGE.contains("params.get('char')"));
    }

    #[test]
    fn test_ready_checks_both_flags() {
        assert!(READY.contains("window.writer"));
        assert!(READY.contains("window.animationReady === true"));
    }
}

//! Integration tests for par-term-engine-fonts crate.

use par_term_engine_config::{EngineConfig, FaceConfig};
use par_term_engine_fonts::{
    FontCatalog, FontError, FontInfoDesired, FontSource, FontState, PixelSize, SOFT_FONT_BASE,
};

fn state_with(family: &str, ambiguous_wide: bool) -> FontState {
    FontState::new(
        FontCatalog::builtin(),
        FontInfoDesired::new(family, 12.0, 400),
        96,
        ambiguous_wide,
        64,
    )
    .unwrap()
}

#[test]
fn test_proposed_font_is_idempotent() {
    let state = state_with("JetBrains Mono", false);
    let desired = FontInfoDesired::new("Fira Code", 13.5, 500);
    let first = state.proposed_font(&desired, 144).unwrap();
    let second = state.proposed_font(&desired, 144).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_proposed_font_does_not_commit() {
    let state = state_with("JetBrains Mono", false);
    let before = state.active().clone();
    let proposed = state
        .proposed_font(&FontInfoDesired::new("Consolas", 20.0, 700), 96)
        .unwrap();
    assert_eq!(proposed.family, "Consolas");
    assert_eq!(state.active(), &before);
}

#[test]
fn test_unknown_family_degrades_to_default_face() {
    let state = state_with("JetBrains Mono", false);
    let info = state
        .proposed_font(&FontInfoDesired::new("No Such Font", 12.0, 400), 96)
        .unwrap();
    assert_eq!(info.family, "JetBrains Mono");
    assert_eq!(info.source, FontSource::FallbackFace);
    assert!(info.is_fallback());
}

#[test]
fn test_weight_snaps_to_nearest_available() {
    let state = state_with("Consolas", false);
    let info = state
        .proposed_font(&FontInfoDesired::new("Consolas", 12.0, 650), 96)
        .unwrap();
    assert_eq!(info.weight, 700);
}

#[test]
fn test_metrics_scale_with_dpi() {
    let state = state_with("JetBrains Mono", false);
    let desired = FontInfoDesired::new("JetBrains Mono", 12.0, 400);
    // 12pt @ 96dpi = 16px; 0.6 advance -> 10px, 1.32 line -> 21px
    let at_96 = state.proposed_font(&desired, 96).unwrap();
    assert_eq!(at_96.cell_size, PixelSize::new(10, 21));
    // 12pt @ 192dpi = 32px
    let at_192 = state.proposed_font(&desired, 192).unwrap();
    assert_eq!(at_192.cell_size, PixelSize::new(19, 42));
}

#[test]
fn test_empty_catalog_proposes_but_cannot_commit() {
    let desired = FontInfoDesired::new("Anything", 12.0, 400);
    let err = FontState::new(FontCatalog::empty(), desired.clone(), 96, false, 8).unwrap_err();
    assert!(matches!(err, FontError::Unavailable(_)));

    let info = par_term_engine_fonts::font_state::resolve(&FontCatalog::empty(), &desired, 96)
        .unwrap();
    assert_eq!(info.source, FontSource::Synthesized);
    assert_eq!(info.cell_size, PixelSize::new(10, 19));
}

#[test]
fn test_update_font_commits_and_reports() {
    let mut state = state_with("JetBrains Mono", false);
    let info = state
        .update_font(&FontInfoDesired::new("Menlo", 14.0, 400), 96)
        .unwrap();
    assert_eq!(state.active(), &info);
    assert_eq!(state.font_size(), info.cell_size);
    assert_eq!(state.desired().family, "Menlo");
}

#[test]
fn test_update_dpi_reresolves_last_request() {
    let mut state = state_with("JetBrains Mono", false);
    let before = state.font_size();
    let info = state.update_dpi(192).unwrap();
    assert_eq!(info.dpi, 192);
    assert_eq!(state.dpi(), 192);
    assert!(state.font_size().width > before.width);
    assert!(state.font_size().height > before.height);
}

#[test]
fn test_glyph_width_queries() {
    let state = state_with("JetBrains Mono", false);
    assert!(!state.is_glyph_wide("A"));
    assert!(state.is_glyph_wide("中"));
    assert!(state.is_glyph_wide("😀"));
    assert!(!state.is_glyph_wide(""));
    // Only the first grapheme counts
    assert!(!state.is_glyph_wide("A中"));
}

#[test]
fn test_ambiguous_width_setting() {
    let narrow = state_with("JetBrains Mono", false);
    let wide = state_with("JetBrains Mono", true);
    assert!(!narrow.is_glyph_wide("±"));
    assert!(wide.is_glyph_wide("±"));
}

#[test]
fn test_soft_font_glyphs_are_narrow_and_replaced() {
    let mut state = state_with("JetBrains Mono", false);
    state
        .update_soft_font(&[0xFF00; 20], PixelSize::new(8, 10), 0)
        .unwrap();
    assert_eq!(state.soft_font().unwrap().glyph_count(), 2);

    let glyph = SOFT_FONT_BASE.to_string();
    assert!(!state.is_glyph_wide(&glyph));

    state
        .update_soft_font(&[0x0F00; 10], PixelSize::new(12, 5), 3)
        .unwrap();
    let font = state.soft_font().unwrap();
    assert_eq!(font.glyph_count(), 2);
    assert_eq!(font.cell_size(), PixelSize::new(12, 5));
    assert_eq!(font.centering_hint(), 3);
}

#[test]
fn test_invalid_soft_font_keeps_previous() {
    let mut state = state_with("JetBrains Mono", false);
    state
        .update_soft_font(&[0xFF00; 10], PixelSize::new(8, 10), 0)
        .unwrap();
    let err = state
        .update_soft_font(&[0xFF00; 7], PixelSize::new(8, 10), 0)
        .unwrap_err();
    assert!(matches!(err, FontError::InvalidSoftFont(_)));
    assert_eq!(state.soft_font().unwrap().glyph_count(), 1);
}

#[test]
fn test_from_config_uses_extra_faces() {
    let mut config = EngineConfig::default().with_font("Iosevka", 12.0);
    config.extra_faces.push(FaceConfig {
        family: "Iosevka".to_string(),
        advance_ratio: 0.5,
        line_ratio: 1.25,
        weights: vec![400],
    });
    let state = FontState::from_config(&config).unwrap();
    assert_eq!(state.active().family, "Iosevka");
    assert_eq!(state.active().source, FontSource::Exact);
    assert_eq!(state.font_size(), PixelSize::new(8, 20));
}

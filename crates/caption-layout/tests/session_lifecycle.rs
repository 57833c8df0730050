//! Session lifecycle tests: submit, area changes, viewer settings and clear.

use caption_core::{
    extract::{
        cea608::CellAttributes,
        cea708::{Cea708Window, Pen},
        ttml::{Outline, TtmlCue, TtmlLayout, TtmlSpan},
        CaptionSource, Cea608Frame, Cea708Service, PlainCue,
    },
    geometry::Rect,
    model::Color,
    model::WindowRect,
    style::{FontSize, Length, Measure},
    CaptionSettings, CaptionType, RenderingArea,
};
use caption_layout::{CaptionSession, SessionConfig, SessionState};
use pretty_assertions::assert_eq;
use std::{cell::RefCell, rc::Rc};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn area(width: i32, height: i32) -> RenderingArea {
    RenderingArea::new(0, 0, width, height, 1.0).unwrap()
}

fn session(caption_type: CaptionType) -> CaptionSession {
    let config = SessionConfig::builder(caption_type).build().unwrap();
    CaptionSession::new(config, area(640, 300)).unwrap()
}

fn measured(measure: Option<Measure>) -> f32 {
    match measure {
        Some(Measure::Pixels(px)) => px,
        other => panic!("unresolved measure {other:?}"),
    }
}

fn ttml_cue(id: u32, y: f32) -> TtmlCue {
    TtmlCue {
        id,
        start_time: 0,
        end_time: 5000,
        layout: TtmlLayout {
            origin: Some((Length::percent(10.0), Length::percent(y))),
            extent: Some((Length::percent(80.0), Length::percent(20.0))),
        },
        spans: vec![TtmlSpan::new("line")],
        ..TtmlCue::default()
    }
}

fn pixels(size: Option<FontSize>) -> f32 {
    match size {
        Some(FontSize::Pixels(px)) => px,
        other => panic!("unresolved font size {other:?}"),
    }
}

#[test]
fn publisher_sees_every_change() {
    init_logging();
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);

    let mut session = session(CaptionType::Plain);
    session.set_publisher(move |attributes: &[caption_core::RenderingAttribute]| {
        sink.borrow_mut().push(attributes.len());
    });

    assert!(session.submit(CaptionSource::Plain(PlainCue::text(1, 0, 1000, "first"))));
    session.set_rendering_area(area(1280, 720));
    session.set_user_settings(CaptionSettings::default());
    session.clear();

    assert_eq!(*published.borrow(), vec![1, 1, 1, 0]);
}

#[test]
fn plain_cues_replace_each_other() {
    init_logging();
    let mut session = session(CaptionType::Plain);
    assert!(session.submit(CaptionSource::Plain(PlainCue::text(1, 0, 1000, "one"))));
    assert!(session.submit(CaptionSource::Plain(PlainCue::text(2, 1000, 2000, "two"))));

    let attributes = session.attributes();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].id, 2);
    // {10%, 75%, 80%, 20%} of 640x300
    assert_eq!(attributes[0].absolute_rect, Rect::new(64, 225, 512, 60));
}

#[test]
fn cea608_blocks_share_the_screen() {
    init_logging();
    let mut session = session(CaptionType::Cea608);
    let mut frame = Cea608Frame::new(0);
    frame.grid.write_text(2, 0, "upper", CellAttributes::default());
    frame.grid.write_text(12, 0, "lower", CellAttributes::default());
    frame.grid.write_text(13, 0, "block", CellAttributes::default());

    assert!(session.submit(CaptionSource::Cea608(frame.clone())));
    assert_eq!(session.attributes().len(), 2);

    // A repeated snapshot replaces, it does not accumulate
    assert!(session.submit(CaptionSource::Cea608(frame)));
    assert_eq!(session.attributes().len(), 2);

    let rects: Vec<Rect> = session
        .attributes()
        .iter()
        .map(|attribute| attribute.absolute_rect)
        .collect();
    assert!(!rects[0].intersects(&rects[1]));

    session.clear();
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn area_change_rescales_user_font_size() {
    init_logging();
    let mut session = session(CaptionType::Plain);
    session.set_user_settings(CaptionSettings {
        font_size: Some(FontSize::Dip(19.0)),
        font_color: Some(Color::YELLOW),
        ..CaptionSettings::default()
    });
    assert!(session.submit(CaptionSource::Plain(PlainCue::text(1, 0, 1000, "scaled"))));

    let before = pixels(session.attributes()[0].settings.font_size);
    assert!((before - 17.0).abs() < 1e-4);
    assert_eq!(session.attributes()[0].settings.font_color, Some(Color::YELLOW));

    session.set_rendering_area(area(640, 600));
    let after = pixels(session.attributes()[0].settings.font_size);
    assert!((after - 34.0).abs() < 1e-4);
    assert_eq!(session.attributes()[0].absolute_rect, Rect::new(64, 450, 512, 120));
    assert_eq!(session.rendering_area().height(), 600);
}

#[test]
fn cea708_hidden_window_leaves_screen() {
    init_logging();
    let mut session = session(CaptionType::Cea708);
    let mut service = Cea708Service::new(0, 1);
    let mut window = Cea708Window::new(1, 2, 20);
    window.write_text(0, "window one", Pen::default());
    service.windows.push(window);

    assert!(session.submit(CaptionSource::Cea708(service.clone())));
    assert_eq!(session.state(), SessionState::Active);

    service.windows[0].visible = false;
    assert!(session.submit(CaptionSource::Cea708(service)));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn mismatched_source_leaves_session_untouched() {
    init_logging();
    let mut session = session(CaptionType::Ttml);
    session
        .submit_attributes(vec![caption_core::RenderingAttribute::new(9, 0, 100).with_runs(Vec::new())]);
    assert!(!session.submit(CaptionSource::Cea608(Cea608Frame::new(0))));
    assert_eq!(session.attributes().len(), 1);
    assert_eq!(session.attributes()[0].id, 9);
}

#[test]
fn overlapping_ttml_cues_are_separated() {
    init_logging();
    let mut session = session(CaptionType::Ttml);
    assert!(session.submit(CaptionSource::Ttml(ttml_cue(1, 80.0))));
    assert!(session.submit(CaptionSource::Ttml(ttml_cue(2, 75.0))));

    let attributes = session.attributes();
    assert_eq!(attributes.len(), 2);
    let bounds = session.rendering_area().bounds();
    assert!(!attributes[0].absolute_rect.intersects(&attributes[1].absolute_rect));
    assert!(bounds.contains(&attributes[0].absolute_rect));
    assert!(bounds.contains(&attributes[1].absolute_rect));
}

#[test]
fn area_change_rescales_ttml_outline_and_padding() {
    init_logging();
    let mut session = session(CaptionType::Ttml);
    let mut cue = ttml_cue(1, 70.0);
    cue.outline = Some(Outline {
        color: Some(Color::BLACK),
        thickness: Length::percent(1.0),
    });
    cue.padding = vec![
        Length::percent(10.0),
        Length::percent(10.0),
        Length::percent(5.0),
        Length::cells(1.0),
    ];
    assert!(session.submit(CaptionSource::Ttml(cue)));

    // 640x300: one row is 20px
    let settings = &session.attributes()[0].settings;
    assert!((pixels(settings.font_size) - 20.0).abs() < 1e-4);
    assert!((measured(settings.edge_width) - 3.0).abs() < 1e-4);
    assert!((measured(settings.padding_top) - 30.0).abs() < 1e-4);
    assert!((measured(settings.padding_bottom) - 30.0).abs() < 1e-4);
    assert!((measured(settings.padding_left) - 32.0).abs() < 1e-4);
    assert!((measured(settings.padding_right) - 640.0 / 15.0).abs() < 1e-3);

    session.set_rendering_area(area(1280, 600));
    let settings = &session.attributes()[0].settings;
    assert!((pixels(settings.font_size) - 40.0).abs() < 1e-4);
    assert!((measured(settings.edge_width) - 6.0).abs() < 1e-4);
    assert!((measured(settings.padding_top) - 60.0).abs() < 1e-4);
    assert!((measured(settings.padding_bottom) - 60.0).abs() < 1e-4);
    assert!((measured(settings.padding_left) - 64.0).abs() < 1e-4);
    assert!((measured(settings.padding_right) - 1280.0 / 15.0).abs() < 1e-3);
}

#[test]
fn user_settings_remerge_active_attributes() {
    init_logging();
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);

    let mut session = session(CaptionType::Ttml);
    session.set_publisher(move |attributes: &[caption_core::RenderingAttribute]| {
        sink.borrow_mut().push(attributes.len());
    });
    assert!(session.submit(CaptionSource::Ttml(ttml_cue(1, 10.0))));
    assert!(session.submit(CaptionSource::Ttml(ttml_cue(2, 60.0))));
    assert!(!session.attributes()[0]
        .absolute_rect
        .intersects(&session.attributes()[1].absolute_rect));

    // Both windows are moved onto the same spot
    session.set_user_settings(CaptionSettings {
        font_color: Some(Color::YELLOW),
        font_size: Some(FontSize::Dip(19.0)),
        window_rect: Some(WindowRect::new(10.0, 75.0, 80.0, 20.0)),
        ..CaptionSettings::default()
    });

    let attributes = session.attributes();
    for attribute in attributes {
        assert_eq!(attribute.settings.font_color, Some(Color::YELLOW));
        assert!((pixels(attribute.settings.font_size) - 17.0).abs() < 1e-4);
        assert_eq!(
            attribute.settings.window_rect,
            Some(WindowRect::new(10.0, 75.0, 80.0, 20.0))
        );
        assert_eq!(attribute.cue_settings.font_color, None);
    }

    // The resolver lifts one above the other
    let mut rects: Vec<Rect> = attributes.iter().map(|attribute| attribute.absolute_rect).collect();
    rects.sort_by_key(|rect| rect.top);
    assert_eq!(rects, vec![Rect::new(64, 165, 512, 60), Rect::new(64, 225, 512, 60)]);
    assert_eq!(*published.borrow(), vec![1, 2, 2]);
}

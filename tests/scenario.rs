//! Drives the editor core with synthetic events the way the window would.

use annotator::canvas::ViewTransform;
use annotator::geometry::{point, Rect};
use annotator::session::SessionState;
use annotator::{
    export, Color4, DrawingSession, EditorRequest, KeyChord, PointerDown, Rasterizer, Shape, Tool,
};
use image::{Rgba, RgbaImage};

#[test]
fn ellipse_then_guideline_then_undo() {
    let mut session = DrawingSession::new();

    session.select_tool(Tool::Ellipse);
    session.choose_color(Some(Color4::RED));
    session.on_pointer_down(point(10.0, 10.0));
    session.on_pointer_move(point(50.0, 50.0));
    assert!(session.on_pointer_up());

    let ellipse = Shape::Ellipse {
        bounds: Rect::from_points(point(10.0, 10.0), point(50.0, 50.0)),
        color: Color4::RED,
    };
    assert_eq!(session.shapes(), &[ellipse.clone()]);

    session.select_tool(Tool::Guideline);
    session.on_pointer_down(point(0.0, 0.0));
    let preview = session.on_pointer_move(point(80.0, 5.0)).cloned();
    assert_eq!(
        preview,
        Some(Shape::Guideline {
            from: point(0.0, 0.0),
            to: point(80.0, 0.0),
            color: Color4::RED,
        })
    );
    assert!(session.on_pointer_up());
    assert_eq!(session.store().len(), 2);

    assert_eq!(session.on_key_chord(KeyChord::ctrl('z')), None);
    assert_eq!(session.shapes(), &[ellipse]);
}

#[test]
fn pointer_positions_go_through_the_view_transform() {
    let mut view = ViewTransform::new((100.0, 100.0));
    let viewport = Rect::from_points(point(0.0, 0.0), point(400.0, 400.0));
    view.fit(viewport);
    assert_eq!(view.zoom, 4.0);

    let mut session = DrawingSession::new();
    session.select_tool(Tool::Rectangle);
    session.on_pointer_down(view.to_scene(viewport, point(40.0, 40.0)));
    session.on_pointer_move(view.to_scene(viewport, point(200.0, 120.0)));
    session.on_pointer_up();

    assert_eq!(
        session.shapes(),
        &[Shape::Rectangle {
            bounds: Rect::from_points(point(10.0, 10.0), point(50.0, 30.0)),
            color: Color4::RED,
        }]
    );
}

#[test]
fn text_tool_never_drags() {
    let mut session = DrawingSession::new();
    session.select_tool(Tool::Text);
    let at = point(20.0, 20.0);
    assert_eq!(session.on_pointer_down(at), PointerDown::PromptText(at));
    assert_eq!(session.state(), SessionState::Prompting);
    assert!(session.preview().is_none());
    session.resolve_text(Some("note".into()));
    assert_eq!(session.shapes(), &[Shape::text(at, "note", Color4::RED)]);
}

#[test]
fn save_request_flattens_current_store() {
    let mut session = DrawingSession::new();
    session.select_tool(Tool::Arrow);
    session.on_pointer_down(point(10.0, 50.0));
    session.on_pointer_move(point(90.0, 50.0));
    session.on_pointer_up();

    assert_eq!(
        session.on_key_chord(KeyChord::ctrl('s')),
        Some(EditorRequest::SaveToFile)
    );

    let base = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255]));
    let flat = Rasterizer::new()
        .unwrap()
        .flatten(&base, session.shapes())
        .unwrap();
    assert_eq!(*flat.get_pixel(40, 50), Rgba([255, 0, 0, 255]));
    assert_eq!(*flat.get_pixel(40, 10), Rgba([0, 0, 255, 255]));
    assert_eq!(session.store().len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let written = export::save_to_file(&flat, &dir.path().join("out.png")).unwrap();
    let reloaded = export::load_image(&written).unwrap();
    assert_eq!(reloaded, flat);
}

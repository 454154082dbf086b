use geosphere_core::{
    animate, lod_for_scale, Canvas, MeshCache, OrthoCamera, Palette, Pipeline, Rgba, SphereMesh,
    Transform, Vec2, ViewState,
};

#[test]
fn full_chain_paints_the_sphere_disc() {
    let cache = MeshCache::new();
    let view = ViewState::default();
    let mesh = cache.get(lod_for_scale(view.scale)).unwrap();

    let mut canvas = Canvas::new(600, 600);
    Pipeline::default().render(&mut canvas, &mesh, &view, 1.0).unwrap();

    // The center is covered by some face, the corners are untouched
    assert_ne!(canvas.get(300, 300), Some(Rgba::TRANSPARENT));
    assert_eq!(canvas.get(0, 0), Some(Rgba::TRANSPARENT));
    assert_eq!(canvas.get(599, 599), Some(Rgba::TRANSPARENT));
}

#[test]
fn stages_compose_by_hand() {
    let mesh = SphereMesh::generate(1).unwrap();
    let animated = animate(&mesh.vertices, 0.5);
    let rotation = Transform::spin_rotation(0.25, 0.8);
    let camera = OrthoCamera::new(Vec2::new(100.0, 100.0), 40.0);
    let triangles = camera.project_faces(&mesh, &animated, &rotation).unwrap();
    assert_eq!(triangles.len(), 80);

    let palette = Palette::default();
    let mut by_hand = Canvas::new(200, 200);
    for (i, points) in triangles.iter().enumerate() {
        by_hand.fill_and_outline(points, palette.face_color(i, 0.5), palette.outline);
    }

    let mut view = ViewState::default();
    view.spin.angle = 0.25;
    view.scale = 40.0;
    view.center = Vec2::new(100.0, 100.0);
    let mut piped = Canvas::new(200, 200);
    Pipeline::default().render(&mut piped, &mesh, &view, 0.5).unwrap();

    assert_eq!(by_hand, piped);
}

#[test]
fn render_is_deterministic() {
    let mesh = SphereMesh::generate(2).unwrap();
    let view = ViewState::default();
    let mut a = Canvas::new(600, 600);
    let mut b = Canvas::new(600, 600);
    Pipeline::default().render(&mut a, &mesh, &view, 2.0).unwrap();
    Pipeline::default().render(&mut b, &mesh, &view, 2.0).unwrap();
    assert_eq!(a, b);
}

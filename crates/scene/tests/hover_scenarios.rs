//! End-to-end pointer and resize scenarios against the demo scene.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use hovercube_scene::{
    Camera, DemoScene, DemoSettings, EventHandlers, Object3D, RenderSurface, ResizeReactor, Scene,
    ViewportSize,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    over: u32,
    out: u32,
    moves: u32,
}

#[derive(Default)]
struct RecordingSurface {
    size: Option<(u32, u32)>,
}

impl RenderSurface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}

fn counted_demo() -> (DemoScene, Rc<RefCell<Counts>>) {
    let mut demo = DemoScene::build(&DemoSettings::default());
    let counts = Rc::new(RefCell::new(Counts::default()));

    let over = Rc::clone(&counts);
    let out = Rc::clone(&counts);
    let moves = Rc::clone(&counts);
    demo.scene
        .handlers_mut(demo.cube)
        .expect("cube exists")
        .on_pointer_over(move |_, _| over.borrow_mut().over += 1)
        .on_pointer_out(move |_, _| out.borrow_mut().out += 1)
        .on_pointer_move(move |_, _| moves.borrow_mut().moves += 1);

    demo.resize(800, 600, &mut RecordingSurface::default());
    (demo, counts)
}

#[test]
fn hovering_the_cube_fires_over_once_then_moves() {
    let (mut demo, counts) = counted_demo();

    demo.pointer_moved(Vec2::new(400.0, 300.0));
    assert_eq!(
        *counts.borrow(),
        Counts {
            over: 1,
            out: 0,
            moves: 1
        }
    );

    demo.pointer_moved(Vec2::new(402.0, 301.0));
    demo.pointer_moved(Vec2::new(398.0, 299.0));
    assert_eq!(
        *counts.borrow(),
        Counts {
            over: 1,
            out: 0,
            moves: 3
        }
    );
    assert!(demo.hover.is_hovered(demo.cube));

    demo.pointer_moved(Vec2::new(10.0, 10.0));
    assert_eq!(
        *counts.borrow(),
        Counts {
            over: 1,
            out: 1,
            moves: 3
        }
    );
    assert!(!demo.hover.is_hovered(demo.cube));
    assert!(demo.hover.is_empty());

    // Staying off the cube does not fire out again.
    demo.pointer_moved(Vec2::new(20.0, 10.0));
    assert_eq!(counts.borrow().out, 1);
}

#[test]
fn re_entering_fires_a_new_over() {
    let (mut demo, counts) = counted_demo();
    demo.pointer_moved(Vec2::new(400.0, 300.0));
    demo.pointer_moved(Vec2::new(10.0, 10.0));
    demo.pointer_moved(Vec2::new(400.0, 300.0));
    assert_eq!(counts.borrow().over, 2);
    assert_eq!(counts.borrow().out, 1);
}

/// Demo scene whose cube has every pointer slot emptied.
fn bare_demo() -> DemoScene {
    let mut demo = DemoScene::build(&DemoSettings::default());
    let handlers = demo.scene.handlers_mut(demo.cube).expect("cube exists");
    *handlers = EventHandlers::default();
    assert!(!handlers.has_pointer_handlers());
    demo.resize(800, 600, &mut RecordingSurface::default());
    demo
}

#[test]
fn out_handler_runs_without_an_over_handler() {
    let mut demo = bare_demo();
    let outs = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&outs);
    let handlers = demo.scene.handlers_mut(demo.cube).expect("cube exists");
    handlers.on_pointer_out(move |_, _| *sink.borrow_mut() += 1);
    assert!(handlers.has_pointer_handlers());

    demo.pointer_moved(Vec2::new(400.0, 300.0));
    assert!(demo.hover.is_hovered(demo.cube));
    assert_eq!(*outs.borrow(), 0);

    demo.pointer_moved(Vec2::new(5.0, 5.0));
    assert_eq!(*outs.borrow(), 1);
    assert!(demo.hover.is_empty());
}

#[test]
fn move_handler_alone_counts_moves() {
    let mut demo = bare_demo();
    let moves = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&moves);
    demo.scene
        .handlers_mut(demo.cube)
        .expect("cube exists")
        .on_pointer_move(move |_, _| *sink.borrow_mut() += 1);

    demo.pointer_moved(Vec2::new(400.0, 300.0));
    demo.pointer_moved(Vec2::new(401.0, 300.0));
    demo.pointer_moved(Vec2::new(5.0, 5.0));
    demo.pointer_moved(Vec2::new(400.0, 300.0));

    assert_eq!(*moves.borrow(), 3);
    // No over handler ran, so the cube keeps its initial color.
    assert_eq!(demo.cube_color(), Some(DemoSettings::default().color));
}

#[test]
fn hover_survives_cube_rotation() {
    let (mut demo, counts) = counted_demo();
    let mut surface = RecordingSurface::default();

    struct Sink;
    impl hovercube_scene::FrameRenderer for Sink {
        type Error = std::convert::Infallible;
        fn render(&mut self, _: &Scene, _: &Camera) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    demo.pointer_moved(Vec2::new(400.0, 300.0));
    for _ in 0..100 {
        demo.frame(&mut Sink).unwrap();
    }
    demo.pointer_moved(Vec2::new(400.0, 300.0));
    demo.resize(1024, 768, &mut surface);
    demo.pointer_moved(Vec2::new(512.0, 384.0));

    assert_eq!(counts.borrow().over, 1);
    assert_eq!(counts.borrow().out, 0);
    assert_eq!(counts.borrow().moves, 3);
}

#[test]
fn resize_from_800x600_to_1600x900() {
    let mut demo = DemoScene::build(&DemoSettings::default());
    let mut surface = RecordingSurface::default();

    demo.resize(800, 600, &mut surface);
    assert_eq!(surface.size, Some((800, 600)));
    assert!((demo.camera.aspect - 800.0 / 600.0).abs() < 1e-6);

    demo.resize(1600, 900, &mut surface);
    assert_eq!(surface.size, Some((1600, 900)));
    assert!((demo.camera.aspect - 1600.0 / 900.0).abs() < 1e-6);
}

#[test]
fn resize_handlers_receive_viewport_from_fov_formula() {
    let mut scene = Scene::new();
    let received: Rc<RefCell<Vec<(&'static str, ViewportSize)>>> = Rc::default();

    let group = scene.add(Object3D::group("group"));
    let child = scene
        .add_child(group, Object3D::group("child"))
        .expect("group exists");
    let silent = scene.add(Object3D::group("silent"));

    for (id, name) in [(group, "group"), (child, "child")] {
        let sink = Rc::clone(&received);
        scene
            .handlers_mut(id)
            .expect("object exists")
            .on_resize(move |_, viewport| sink.borrow_mut().push((name, *viewport)));
    }
    assert!(!scene.handlers_mut(silent).expect("object exists").has_resize_handler());

    let mut camera = Camera::new(75.0, 1.0, 0.1, 1000.0);
    let mut reactor = ResizeReactor::new();
    let viewport = reactor
        .resize(1600, 900, &mut camera, &mut scene, &mut RecordingSurface::default())
        .expect("non-zero size");

    let aspect = 1600.0 / 900.0;
    let expected_height = 2.0 * (75.0_f32.to_radians() / 2.0).tan() * 5.0;
    assert!((viewport.height - expected_height).abs() < 1e-4);
    assert!((viewport.width - expected_height * aspect).abs() < 1e-4);
    assert!((viewport.aspect - aspect).abs() < 1e-6);

    let received = received.borrow();
    let names: Vec<_> = received.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["group", "child"]);
    assert!(received.iter().all(|(_, seen)| *seen == viewport));
}

//! End-to-end layout scenarios.

use glam::DVec2;
use tether_layout::builders::{
    aspect, bind_to, bottom_inside, centered_x, centered_y, fill, left_inside, left_of, own,
    param, percent_of_height, percent_of_width, relative, right_inside, right_of, top_inside,
    under, x_percent, y_percent,
};
use tether_layout::{
    Constraint, LayoutContext, LayoutError, LayoutOptions, Prop, ResolutionError, WidgetId,
    WidgetKind,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn context(width: f64, height: f64) -> LayoutContext {
    LayoutContext::new(LayoutOptions::default().with_viewport(width, height))
}

fn panel(ctx: &mut LayoutContext, master: WidgetId, constraints: Vec<Constraint>) -> WidgetId {
    let id = ctx.create_widget(master, WidgetKind::Panel).unwrap();
    ctx.set_constraints(id, constraints).unwrap();
    id
}

#[test]
fn test_left_pane_resolves() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            top_inside(10.0),
            bottom_inside(10.0),
            percent_of_width(0.2),
        ],
    );

    ctx.evaluate_frame().unwrap();
    let g = ctx.geometry(pane).unwrap();
    assert_close(g.x, 10.0);
    assert_close(g.y, 10.0);
    assert_close(g.width, 160.0);
    assert_close(g.height, 430.0);
}

#[test]
fn test_under_sibling_stacks_below() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let a = panel(
        &mut ctx,
        root,
        vec![
            left_inside(0.0),
            bottom_inside(100.0),
            own(Prop::Width).equals(50.0).into(),
            own(Prop::Height).equals(50.0).into(),
        ],
    );
    let b = panel(
        &mut ctx,
        root,
        vec![
            under(a, 10.0),
            left_inside(0.0),
            own(Prop::Width).equals(50.0).into(),
            own(Prop::Height).equals(30.0).into(),
        ],
    );

    ctx.evaluate_frame().unwrap();
    assert_close(ctx.geometry(a).unwrap().y, 100.0);
    let g = ctx.geometry(b).unwrap();
    assert_close(g.top(), 90.0);
    assert_close(g.y, 60.0);
}

#[test]
fn test_buttons_in_a_side_pane() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            top_inside(10.0),
            bottom_inside(10.0),
            percent_of_width(0.2),
        ],
    );
    let first = panel(
        &mut ctx,
        pane,
        vec![
            top_inside(10.0),
            left_inside(10.0),
            right_inside(10.0),
            percent_of_height(0.1),
        ],
    );
    let second = panel(
        &mut ctx,
        pane,
        vec![
            under(first, 10.0),
            left_inside(10.0),
            right_inside(10.0),
            percent_of_height(0.1),
        ],
    );

    ctx.evaluate_frame().unwrap();
    let pane_g = ctx.geometry(pane).unwrap();
    let first_g = ctx.geometry(first).unwrap();
    let second_g = ctx.geometry(second).unwrap();

    assert_close(first_g.x, 20.0);
    assert_close(first_g.width, pane_g.width - 20.0);
    assert_close(first_g.top(), pane_g.top() - 10.0);
    assert_close(first_g.height, 58.0);
    assert_close(second_g.top(), first_g.y - 10.0);
    assert_eq!(ctx.depth(second), Some(2));
}

#[test]
fn test_conflicting_edges_are_unsatisfiable() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            left_inside(20.0),
            bottom_inside(0.0),
            own(Prop::Width).equals(10.0).into(),
            own(Prop::Height).equals(10.0).into(),
        ],
    );

    match ctx.evaluate_frame() {
        Err(LayoutError::Resolution(ResolutionError::Unsatisfiable { widget, .. })) => {
            assert_eq!(widget, pane)
        }
        other => panic!("expected unsatisfiable, got {:?}", other),
    }
    assert!(ctx.geometry(pane).is_none());
    assert_eq!(ctx.locate(DVec2::new(15.0, 5.0)), None);
}

#[test]
fn test_redundant_width_holds_for_every_viewport() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            right_inside(10.0),
            own(Prop::Width).equals(relative(Prop::Width) - 20.0).into(),
            bottom_inside(0.0),
            percent_of_height(1.0),
        ],
    );

    ctx.evaluate_frame().unwrap();
    assert_close(ctx.geometry(pane).unwrap().width, 780.0);

    ctx.on_root_resize(500.0, 450.0);
    ctx.evaluate_frame().unwrap();
    assert_close(ctx.geometry(pane).unwrap().width, 480.0);
}

#[test]
fn test_fixed_size_between_insets_is_unsatisfiable() {
    // Both insets plus width = 780 only agree for an 800 wide viewport;
    // a solution has to hold for every viewport size.
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            right_inside(10.0),
            own(Prop::Width).equals(780.0).into(),
            bottom_inside(0.0),
            percent_of_height(1.0),
        ],
    );

    match ctx.evaluate_frame() {
        Err(LayoutError::Resolution(ResolutionError::Unsatisfiable { widget, constraint })) => {
            assert_eq!(widget, pane);
            assert_eq!(constraint, "self.width = 780");
        }
        other => panic!("expected unsatisfiable, got {:?}", other),
    }
    assert!(ctx.geometry(pane).is_none());
}

#[test]
fn test_two_constraints_are_underdetermined() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(&mut ctx, root, vec![left_inside(10.0), bottom_inside(10.0)]);

    let err = ctx.evaluate_frame().unwrap_err();
    match err {
        LayoutError::Resolution(ResolutionError::Underdetermined { widget, prop }) => {
            assert_eq!(widget, pane);
            assert_eq!(prop, Prop::Width);
        }
        other => panic!("expected underdetermined, got {:?}", other),
    }
    assert!(err.to_string().contains(&pane.to_string()));
}

#[test]
fn test_fixing_constraints_recovers() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(&mut ctx, root, vec![left_inside(10.0), bottom_inside(10.0)]);
    assert!(ctx.evaluate_frame().is_err());
    assert!(ctx.evaluate_frame().is_err());

    ctx.set_constraints(
        pane,
        [
            left_inside(10.0),
            bottom_inside(10.0),
            percent_of_width(0.5),
            aspect(2.0),
        ],
    )
    .unwrap();
    let frame = ctx.evaluate_frame().unwrap();
    assert!(frame.resolved);
    let g = ctx.geometry(pane).unwrap();
    assert_close(g.width, 400.0);
    assert_close(g.height, 200.0);
}

#[test]
fn test_resize_reevaluates_without_resolving() {
    let mut ctx = context(800.0, 450.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(10.0),
            top_inside(10.0),
            bottom_inside(10.0),
            percent_of_width(0.2),
        ],
    );
    ctx.evaluate_frame().unwrap();

    ctx.on_root_resize(1000.0, 500.0);
    let frame = ctx.evaluate_frame().unwrap();
    assert!(!frame.resolved);
    assert_eq!(frame.evaluated, 2);
    assert_eq!(frame.redraw.len(), 2);

    let g = ctx.geometry(pane).unwrap();
    assert_close(g.width, 200.0);
    assert_close(g.height, 480.0);
}

#[test]
fn test_centered_widget_follows_the_viewport() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let label = ctx
        .create_widget(root, WidgetKind::Label { text: None })
        .unwrap();
    ctx.set_constraints(
        label,
        [
            centered_x(),
            centered_y(),
            percent_of_height(0.5),
            percent_of_width(0.5),
        ],
    )
    .unwrap();

    ctx.evaluate_frame().unwrap();
    let g = ctx.geometry(label).unwrap();
    assert_close(g.center_x(), 400.0);
    assert_close(g.center_y(), 300.0);

    ctx.on_root_resize(400.0, 200.0);
    ctx.evaluate_frame().unwrap();
    let g = ctx.geometry(label).unwrap();
    assert_close(g.center_x(), 200.0);
    assert_close(g.center_y(), 100.0);
    assert_close(g.width, 200.0);
}

#[test]
fn test_grid_of_percent_positions() {
    let mut ctx = context(900.0, 600.0);
    let root = ctx.root();
    let mut cells = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            cells.push(panel(
                &mut ctx,
                root,
                vec![
                    percent_of_width(1.0 / 3.0),
                    percent_of_height(1.0 / 3.0),
                    y_percent(i as f64 / 3.0),
                    x_percent(j as f64 / 3.0),
                ],
            ));
        }
    }

    ctx.evaluate_frame().unwrap();
    let last = ctx.geometry(cells[8]).unwrap();
    assert_close(last.x, 600.0);
    assert_close(last.y, 400.0);
    assert_close(last.width, 300.0);
    assert_eq!(ctx.locate(DVec2::new(450.0, 300.0)), Some(cells[4]));
}

#[test]
fn test_horizontal_neighbours() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let middle = panel(
        &mut ctx,
        root,
        vec![
            centered_x(),
            bottom_inside(0.0),
            own(Prop::Width).equals(100.0).into(),
            percent_of_height(1.0),
        ],
    );
    let right = panel(
        &mut ctx,
        root,
        vec![
            right_of(middle, 5.0),
            bottom_inside(0.0),
            own(Prop::Width).equals(50.0).into(),
            percent_of_height(1.0),
        ],
    );
    let left = panel(
        &mut ctx,
        root,
        vec![
            left_of(middle, 5.0),
            bottom_inside(0.0),
            own(Prop::Width).equals(50.0).into(),
            percent_of_height(1.0),
        ],
    );

    ctx.evaluate_frame().unwrap();
    assert_close(ctx.geometry(middle).unwrap().x, 350.0);
    assert_close(ctx.geometry(right).unwrap().x, 455.0);
    assert_close(ctx.geometry(left).unwrap().right(), 345.0);
    assert_eq!(ctx.widget(right).unwrap().dependencies().collect::<Vec<_>>(), vec![middle]);
}

#[test]
fn test_bind_to_an_ancestor() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(100.0),
            bottom_inside(100.0),
            own(Prop::Width).equals(200.0).into(),
            own(Prop::Height).equals(200.0).into(),
        ],
    );
    let badge = panel(
        &mut ctx,
        pane,
        vec![
            bind_to(root, right_inside(10.0)),
            bind_to(root, top_inside(10.0)),
            own(Prop::Width).equals(20.0).into(),
            own(Prop::Height).equals(20.0).into(),
        ],
    );

    ctx.evaluate_frame().unwrap();
    let g = ctx.geometry(badge).unwrap();
    assert_close(g.right(), 790.0);
    assert_close(g.top(), 590.0);
}

#[test]
fn test_animated_parameter_moves_without_resolve() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let slide = ctx.create_parameter("slide", 0.0);
    let pane = panel(
        &mut ctx,
        root,
        vec![
            left_inside(param(slide) + 10.0),
            bottom_inside(0.0),
            own(Prop::Width).equals(100.0).into(),
            percent_of_height(1.0),
        ],
    );
    ctx.evaluate_frame().unwrap();
    assert_close(ctx.geometry(pane).unwrap().x, 10.0);

    ctx.set_parameter(slide, 90.0).unwrap();
    let frame = ctx.evaluate_frame().unwrap();
    assert!(!frame.resolved);
    assert_close(ctx.geometry(pane).unwrap().x, 100.0);
}

#[test]
fn test_undeclared_parameter_is_rejected() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let pane = ctx.create_widget(root, WidgetKind::Panel).unwrap();
    let err = ctx
        .set_constraints(pane, [left_inside(param(tether_layout::ParamId(3)))])
        .unwrap_err();
    assert_eq!(err, LayoutError::UnknownParameter(tether_layout::ParamId(3)));
}

#[test]
fn test_overlapping_siblings_pick_one() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let offset = ctx.create_parameter("offset", 0.0);
    let first = panel(&mut ctx, root, fill().to_vec());
    let second = panel(
        &mut ctx,
        root,
        vec![
            left_inside(param(offset)),
            bottom_inside(0.0),
            own(Prop::Width).equals(100.0).into(),
            own(Prop::Height).equals(100.0).into(),
        ],
    );
    ctx.evaluate_frame().unwrap();

    let p = DVec2::new(50.0, 50.0);
    // both cover p; the later sibling is on top
    assert_eq!(ctx.locate(p), Some(second));

    ctx.set_parameter(offset, 200.0).unwrap();
    ctx.evaluate_frame().unwrap();
    assert_eq!(ctx.locate(p), Some(first));
}

#[test]
fn test_destroying_a_target_surfaces_on_next_frame() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let a = panel(&mut ctx, root, fill().to_vec());
    let b = panel(
        &mut ctx,
        root,
        vec![
            under(a, 0.0),
            left_inside(0.0),
            percent_of_width(1.0),
            own(Prop::Height).equals(10.0).into(),
        ],
    );
    ctx.evaluate_frame().unwrap();

    ctx.destroy(a).unwrap();
    let err = ctx.evaluate_frame().unwrap_err();
    assert_eq!(
        err,
        ResolutionError::Underdetermined {
            widget: b,
            prop: Prop::Y
        }
        .into()
    );
    assert!(ctx.widget(a).is_none());

    ctx.set_constraints(b, fill()).unwrap();
    ctx.evaluate_frame().unwrap();
    assert_eq!(ctx.widget(root).unwrap().children(), &[b]);
}

#[test]
fn test_draw_items_follow_registration_order() {
    let mut ctx = context(800.0, 600.0);
    let root = ctx.root();
    let a = panel(&mut ctx, root, fill().to_vec());
    let b = panel(&mut ctx, a, fill().to_vec());
    let c = panel(&mut ctx, root, fill().to_vec());

    let frame = ctx.evaluate_frame().unwrap();
    let order: Vec<(WidgetId, usize)> = frame.redraw.iter().map(|d| (d.widget, d.z)).collect();
    assert_eq!(order, vec![(root, 0), (a, 1), (b, 2), (c, 1)]);
}

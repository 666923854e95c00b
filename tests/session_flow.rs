use vitrine::{Director, Fps, InputEvent, Stage, Viewport};

/// 10 fps keeps the intro short: the loading handover lands on tick 26.
fn fast_stage() -> Stage {
    let mut stage = Stage::demo();
    stage.fps = Fps::new(10, 1).unwrap();
    stage
}

fn run(d: &mut Director, frames: usize) {
    for _ in 0..frames {
        d.tick(&[]).unwrap();
    }
}

fn finish_loading(d: &mut Director) {
    run(d, 30);
    assert!(d.content_ready());
}

#[test]
fn page_scroll_clamps_at_both_ends() {
    let mut d = Director::new(fast_stage(), None).unwrap();
    finish_loading(&mut d);

    d.tick(&[InputEvent::Wheel { delta_y: 500.0 }]).unwrap();
    assert_eq!(d.scroller().target(), 500.0);

    d.tick(&[InputEvent::Wheel { delta_y: -10_000.0 }]).unwrap();
    assert_eq!(d.scroller().target(), 0.0);

    d.tick(&[InputEvent::Wheel { delta_y: 1.0e9 }]).unwrap();
    let max = d.scroller().max_scroll();
    assert!(max > 0.0);
    assert_eq!(d.scroller().target(), max);
}

#[test]
fn reveal_sections_slide_in_as_they_scroll_into_view() {
    let mut d = Director::new(fast_stage(), None).unwrap();
    finish_loading(&mut d);
    assert_eq!(d.reveal().len(), 3);
    assert_eq!(d.reveal().visible_count(), 0);

    d.tick(&[InputEvent::Wheel { delta_y: 700.0 }]).unwrap();
    run(&mut d, 60);
    assert!(d.reveal().is_visible(0), "second section must be on screen");
    let p = d.reveal().progress(0);
    assert!(p > 0.5, "slide-in should be well underway, got {p}");

    // Scrolling away eases the presentation back out.
    d.tick(&[InputEvent::Wheel { delta_y: -700.0 }]).unwrap();
    run(&mut d, 60);
    assert!(!d.reveal().is_visible(0));
    assert!(d.reveal().progress(0) < 0.1);
}

#[test]
fn full_open_close_cycle_leaves_the_page_where_it_was() {
    let mut d = Director::new(fast_stage(), None).unwrap();
    finish_loading(&mut d);

    d.tick(&[InputEvent::Wheel { delta_y: 400.0 }]).unwrap();
    run(&mut d, 80);
    let settled = d.scroller().offset();
    assert!((settled - 400.0).abs() < 1.0);

    let row = d.layout().project_rows[2];
    let scroll = d.scroller().offset();
    d.tick(&[InputEvent::Click {
        x: (row.x0 + row.x1) / 2.0,
        y: (row.y0 + row.y1) / 2.0 - scroll,
    }])
    .unwrap();
    assert!(d.gate().is_raised());
    run(&mut d, 8);

    let session = d.transitions().session().unwrap();
    assert_eq!(session.project().0, 2);
    let expected_triggers = session.trigger_count();
    let back = session.layout().back_button;

    // Page wheel input is inert while the overlay owns the screen.
    d.tick(&[InputEvent::Wheel { delta_y: 300.0 }]).unwrap();
    assert_eq!(d.transitions().session().unwrap().scroll_y(), 300.0);
    assert_eq!(d.scroller().target(), 400.0);

    d.tick(&[InputEvent::Click {
        x: (back.x0 + back.x1) / 2.0,
        y: (back.y0 + back.y1) / 2.0,
    }])
    .unwrap();
    run(&mut d, 10);

    assert!(d.transitions().session().is_none());
    assert!(!d.gate().is_raised());
    assert_eq!(d.transitions().last_released_triggers().len(), expected_triggers);
    assert!((d.scroller().offset() - settled).abs() < 1.0);

    // The page is interactive again.
    d.tick(&[InputEvent::Wheel { delta_y: 100.0 }]).unwrap();
    assert_eq!(d.scroller().target(), 500.0);
}

#[test]
fn empty_viewport_session_still_hands_over() {
    let mut stage = fast_stage();
    stage.viewport = Viewport::new(0, 0);
    let mut d = Director::new(stage, None).unwrap();
    run(&mut d, 60);
    assert!(d.content_ready());
    assert!(d.loading().is_finished());
    assert!(d.loading().dissolve().is_empty());
}

#[test]
fn touch_stage_suppresses_the_hover_preview() {
    let mut stage = fast_stage();
    stage.touch = true;
    let mut d = Director::new(stage, None).unwrap();
    finish_loading(&mut d);

    let row = d.layout().project_rows[0];
    d.tick(&[InputEvent::PointerMoved {
        x: (row.x0 + row.x1) / 2.0,
        y: (row.y0 + row.y1) / 2.0,
    }])
    .unwrap();
    assert!(d.transitions().hover().is_none());
    // The cursor still reacts; only the preview panel is withheld.
    assert!(d.cursor().is_hover());
}

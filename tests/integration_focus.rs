mod common;

use common::{Call, Recorder, calls, click, new_log, screen};
use widget_screen::{KeyAction, KeyEvent, Modifiers, MouseButton, RawEvent, Rect, Role, keys};

fn enter() -> KeyEvent {
    KeyEvent::new(keys::ENTER, KeyAction::Press, Modifiers::empty())
}

#[test]
fn set_focus_then_clear_sends_only_focus_lost() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(10, 10, 80, 60), false, Recorder::new("win", &log));
    let panel = s
        .tree_mut()
        .add_child(win, Role::Leaf, Rect::new(5, 5, 50, 40), Recorder::new("panel", &log))
        .unwrap();
    let leaf = s
        .tree_mut()
        .add_child(panel, Role::Leaf, Rect::new(2, 2, 10, 10), Recorder::new("leaf", &log))
        .unwrap();

    s.set_focus(Some(leaf));
    // focus-gained goes outermost first
    let gained: Vec<_> = log.borrow().iter().map(|(n, c)| (*n, c.clone())).collect();
    assert_eq!(
        gained,
        vec![
            ("win", Call::Focus(true)),
            ("panel", Call::Focus(true)),
            ("leaf", Call::Focus(true)),
        ]
    );
    assert_eq!(s.focus_path().entries(), &[leaf, panel, win]);
    assert_eq!(s.focus_path().window(), Some(win));

    log.borrow_mut().clear();
    s.set_focus(None);
    let lost: Vec<_> = log.borrow().iter().map(|(n, c)| (*n, c.clone())).collect();
    assert_eq!(
        lost,
        vec![
            ("leaf", Call::Focus(false)),
            ("panel", Call::Focus(false)),
            ("win", Call::Focus(false)),
        ]
    );
    assert!(s.focus_path().is_empty());
    for id in [leaf, panel, win] {
        assert!(!s.tree().is_focused(id));
    }
}

#[test]
fn refocusing_shared_ancestors_notifies_both_ways() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 100, 100), false, Recorder::new("win", &log));
    let a = s
        .tree_mut()
        .add_child(win, Role::Leaf, Rect::new(0, 0, 10, 10), Recorder::new("a", &log))
        .unwrap();
    let b = s
        .tree_mut()
        .add_child(win, Role::Leaf, Rect::new(20, 0, 10, 10), Recorder::new("b", &log))
        .unwrap();

    s.set_focus(Some(a));
    log.borrow_mut().clear();
    s.set_focus(Some(b));

    assert_eq!(calls(&log, "a"), vec![Call::Focus(false)]);
    assert_eq!(calls(&log, "win"), vec![Call::Focus(false), Call::Focus(true)]);
    assert_eq!(calls(&log, "b"), vec![Call::Focus(true)]);
    assert!(s.tree().is_focused(win));
    assert!(!s.tree().is_focused(a));
}

#[test]
fn disposing_a_window_on_the_path_empties_it() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 50, 50), false, Recorder::new("win", &log));
    let leaf = s
        .tree_mut()
        .add_child(win, Role::Leaf, Rect::new(0, 0, 10, 10), Recorder::new("leaf", &log))
        .unwrap();
    let other = s
        .tree_mut()
        .add_window(Rect::new(100, 0, 50, 50), false, Recorder::new("other", &log));

    s.set_focus(Some(leaf));
    s.dispose_window(win);

    assert!(s.focus_path().is_empty());
    assert!(!s.tree().is_alive(win));
    assert!(!s.tree().is_alive(leaf));
    assert_eq!(s.window_order(), &[other]);
    assert!(s.focus_path().is_consistent(s.tree()));
}

#[test]
fn disposing_an_unrelated_window_keeps_focus() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 50, 50), false, Recorder::new("win", &log));
    let other = s
        .tree_mut()
        .add_window(Rect::new(100, 0, 50, 50), false, Recorder::new("other", &log));

    s.set_focus(Some(win));
    s.dispose_window(other);
    assert_eq!(s.focus_path().entries(), &[win]);
    // a second dispose of the same id is a silent no-op
    s.dispose_window(other);
    assert_eq!(s.window_order(), &[win]);
}

#[test]
fn keys_walk_outermost_first_and_skip_the_window_entry() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s.tree_mut().add_window(
        Rect::new(0, 0, 100, 100),
        false,
        Recorder::new("win", &log).consuming_keys(),
    );
    let panel = s
        .tree_mut()
        .add_child(
            win,
            Role::Leaf,
            Rect::new(0, 0, 50, 50),
            Recorder::new("panel", &log).consuming_keys(),
        )
        .unwrap();
    let leaf = s
        .tree_mut()
        .add_child(
            panel,
            Role::Leaf,
            Rect::new(0, 0, 10, 10),
            Recorder::new("leaf", &log).consuming_keys(),
        )
        .unwrap();

    s.set_focus(Some(leaf));
    log.borrow_mut().clear();

    assert!(s.key(enter()));
    // the enclosing window entry never sees keyboard input, even though it
    // would consume it; the outermost remaining entry wins
    assert!(calls(&log, "win").is_empty());
    assert_eq!(calls(&log, "panel"), vec![Call::Key(keys::ENTER)]);
    assert!(calls(&log, "leaf").is_empty());
}

#[test]
fn keys_fall_through_to_inner_entries_until_consumed() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 100, 100), false, Recorder::new("win", &log));
    let panel = s
        .tree_mut()
        .add_child(win, Role::Leaf, Rect::new(0, 0, 50, 50), Recorder::new("panel", &log))
        .unwrap();
    let leaf = s
        .tree_mut()
        .add_child(
            panel,
            Role::Leaf,
            Rect::new(0, 0, 10, 10),
            Recorder::new("leaf", &log).consuming_keys(),
        )
        .unwrap();

    s.set_focus(Some(leaf));
    log.borrow_mut().clear();

    assert!(s.process_event(RawEvent::Text("hi".to_string())));
    assert_eq!(calls(&log, "panel"), vec![Call::Char('h'), Call::Char('i')]);
    assert_eq!(calls(&log, "leaf"), vec![Call::Char('h'), Call::Char('i')]);
}

#[test]
fn stale_path_entries_receive_no_keys() {
    let log = new_log();
    let mut s = screen(200, 100);
    let win = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 100, 100), false, Recorder::new("win", &log));
    let leaf = s
        .tree_mut()
        .add_child(
            win,
            Role::Leaf,
            Rect::new(0, 0, 10, 10),
            Recorder::new("leaf", &log).consuming_keys(),
        )
        .unwrap();

    s.set_focus(Some(leaf));
    // removing the leaf behind the screen's back leaves a stale path entry
    assert!(s.tree_mut().remove(leaf));
    log.borrow_mut().clear();

    assert!(!s.key(enter()));
    assert!(!s.character('x'));
    assert!(log.borrow().is_empty());
}

#[test]
fn left_press_focuses_the_hit_widget() {
    let log = new_log();
    let mut s = screen(200, 100);
    let w1 = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 60, 60), false, Recorder::new("w1", &log));
    let field = s
        .tree_mut()
        .add_child(w1, Role::Leaf, Rect::new(10, 10, 20, 5), Recorder::new("field", &log))
        .unwrap();
    let w2 = s
        .tree_mut()
        .add_window(Rect::new(100, 0, 60, 60), false, Recorder::new("w2", &log));

    assert_eq!(s.window_order(), &[w1, w2]);
    click(&mut s, 15.0, 12.0);

    assert_eq!(s.focus_path().entries(), &[field, w1]);
    assert!(s.tree().is_focused(field));
    // focusing raised the owning window
    assert_eq!(s.window_order(), &[w2, w1]);
}

#[test]
fn press_on_background_clears_focus() {
    let log = new_log();
    let mut s = screen(200, 100);
    let w = s
        .tree_mut()
        .add_window(Rect::new(0, 0, 60, 60), false, Recorder::new("w", &log));
    s.pointer_move(150.0, 90.0);
    s.set_focus(Some(w));
    log.borrow_mut().clear();

    s.pointer_button(MouseButton::Left, true, Modifiers::empty());
    s.pointer_button(MouseButton::Left, false, Modifiers::empty());
    assert!(s.focus_path().is_empty());
    assert_eq!(calls(&log, "w"), vec![Call::Focus(false)]);
}

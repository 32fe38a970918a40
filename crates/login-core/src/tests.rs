#[cfg(test)]
mod tests {
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(String::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        sig.subscribe(move |v: &String| seen_clone.borrow_mut().push(v.clone()));

        sig.set("a".into());
        sig.update(|s| s.push('b'));
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[test]
    fn test_subscriber_can_read_signal() {
        let sig = signal(1);
        let mirror = Rc::new(RefCell::new(0));
        let (s2, m2) = (sig.clone(), mirror.clone());
        sig.subscribe(move |_| *m2.borrow_mut() = s2.get() * 10);
        sig.set(4);
        assert_eq!(*mirror.borrow(), 40);
    }

    #[test]
    fn test_key_based_remember() {
        COMPOSER.with(|c| c.borrow_mut().keyed_slots.clear());

        let val1 = remember_with_key("test", || 42);
        let val2 = remember_with_key("test", || 100);

        assert_eq!(*val1, 42);
        assert_eq!(*val2, 42);
    }

    #[test]
    fn test_positional_remember_survives_recomposition() {
        let mut sched = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..3 {
            let seen = seen.clone();
            sched
                .compose(
                    move |_| {
                        let taps = remember(|| signal(0u32));
                        taps.update(|t| *t += 1);
                        seen.borrow_mut().push(taps.get());
                        View::new(0, ViewKind::Box)
                    },
                    |_, _| Ok((Scene::default(), vec![], vec![])),
                )
                .unwrap();
        }
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_focus_chain_only_has_focusable_regions() {
        let mut sched = Scheduler::new();
        let frame = sched
            .compose(
                |_| View::new(0, ViewKind::Box),
                |_, _| {
                    let r = Rect {
                        x: 0.0,
                        y: 0.0,
                        w: 10.0,
                        h: 10.0,
                    };
                    let mut a = HitRegion::new(1, r);
                    a.focusable = true;
                    let b = HitRegion::new(2, r);
                    let mut c = HitRegion::new(3, r);
                    c.focusable = true;
                    Ok((Scene::default(), vec![a, b, c], vec![]))
                },
            )
            .unwrap();
        assert_eq!(frame.focus_chain, vec![1, 3]);
        // later regions paint over earlier ones
        assert_eq!(frame.hit_at(Vec2 { x: 5.0, y: 5.0 }).map(|h| h.id), Some(3));
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#0095F6");
        assert_eq!(c, Color(0x00, 0x95, 0xF6, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));

        assert_eq!(Color::from_hex("#12"), Color::BLACK);
    }

    #[test]
    fn test_copy_alpha() {
        assert_eq!(Color::WHITE.copy_alpha(0.4), Color(255, 255, 255, 102));
        assert_eq!(Color::LIGHT_GRAY.copy_alpha(2.0).3, 255);
    }

    #[test]
    fn test_button_colors_resolve() {
        let colors = ButtonColors {
            container: Color::BLACK,
            content: Color::WHITE,
            disabled_container: Color::GRAY,
            disabled_content: Color::LIGHT_GRAY,
        };
        assert_eq!(colors.resolve(true), (Color::BLACK, Color::WHITE));
        assert_eq!(colors.resolve(false), (Color::GRAY, Color::LIGHT_GRAY));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let b = Rect {
            x: 5.0,
            y: 5.0,
            w: 10.0,
            h: 10.0,
        };
        assert_eq!(
            a.intersect(&b),
            Some(Rect {
                x: 5.0,
                y: 5.0,
                w: 5.0,
                h: 5.0
            })
        );
        assert_eq!(a.intersect(&Rect { x: 20.0, ..b }), None);
    }

    #[test]
    fn test_locals_nest_and_restore() {
        assert_eq!(density().scale, 1.0);
        with_density(Density { scale: 3.0 }, || {
            with_text_scale(TextScale(1.5), || {
                assert_eq!(sp_to_px(10.0), 45.0);
            });
            assert_eq!(text_scale().0, 1.0);
        });
        assert_eq!(dp_to_px(10.0), 10.0);
    }
}

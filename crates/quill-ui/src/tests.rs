#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_core::*;
    use quill_text::{FixedAdvanceFace, char_len};

    use crate::*;

    const RED: Color = Color(255, 0, 0, 255);
    const BLUE: Color = Color(0, 0, 255, 255);
    const GRAY: Color = Color(128, 128, 128, 255);

    struct Rig {
        clock: Arc<TestClock>,
        start: Instant,
        input: FrameInput,
        screen: PixelBuffer,
        deferred: DeferredQueue,
    }

    impl Rig {
        fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let start = Instant::now();
            Self {
                clock: Arc::new(TestClock::new(start)),
                start,
                input: FrameInput::new(),
                screen: PixelBuffer::new(160, 40),
                deferred: DeferredQueue::new(),
            }
        }

        // 10px advances, 16px lines.
        fn options(&self) -> TextInputOptions {
            let clock: Arc<dyn Clock> = self.clock.clone();
            TextInputOptions::new(Arc::new(FixedAdvanceFace::new(10.0, 16.0)))
                .clock(clock.clone())
                .timers(Arc::new(ManualTimers::new(clock)))
        }

        fn field(&self, opts: TextInputOptions) -> TextInput {
            let mut field = TextInput::new(opts);
            field.set_location(Rect::new(0, 0, 100, 20));
            field
        }

        fn at(&self, ms: u64) {
            self.clock.set(self.start + Duration::from_millis(ms));
        }

        fn frame(&mut self, field: &mut TextInput) {
            self.screen.clear();
            field.render(&mut self.screen, &self.input, &mut self.deferred);
            self.deferred.flush(&mut self.screen);
            self.input.begin_frame();
        }

        fn click(&mut self, field: &mut TextInput, x: i32, y: i32) {
            self.input.move_cursor(Point::new(x, y));
            self.input.click(MouseButton::Primary);
            self.frame(field);
        }

        fn type_char(&mut self, field: &mut TextInput, c: char) {
            self.input.type_text(&c.to_string());
            self.frame(field);
        }
    }

    #[test]
    fn typing_inserts_at_the_cursor() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());

        for c in "abc".chars() {
            rig.type_char(&mut field, c);
        }
        assert_eq!(field.text(), "abc");
        assert_eq!(field.cursor(), 3);

        field.set_cursor(1);
        rig.type_char(&mut field, 'é');
        assert_eq!(field.text(), "aébc");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn one_character_is_consumed_per_frame() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());

        rig.input.type_text("xyz");
        rig.frame(&mut field);
        assert_eq!(field.text(), "x");
        assert!(field.session().is_idle());
    }

    #[test]
    fn validation_rejects_growth_and_keeps_state() {
        let mut rig = Rig::new();
        let opts = rig.options().validation(|s| char_len(s) <= 3);
        let mut field = rig.field(opts);
        field.set_text("abc");
        field.set_cursor(3);

        rig.type_char(&mut field, 'd');
        assert_eq!(field.text(), "abc");
        assert_eq!(field.cursor(), 3);

        field.set_cursor(1);
        rig.type_char(&mut field, 'd');
        assert_eq!(field.text(), "abc");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn deletions_bypass_validation() {
        let mut rig = Rig::new();
        let opts = rig.options().validation(|_| false);
        let mut field = rig.field(opts);
        field.set_text("ab");
        field.set_cursor(2);

        rig.input.press_key(Key::Backspace);
        rig.frame(&mut field);
        assert_eq!(field.text(), "a");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn held_backspace_repeats_after_delay_then_at_interval() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("hello");
        field.set_cursor(5);

        rig.input.press_key(Key::Backspace);
        let mut trace = Vec::new();
        for ms in [0, 100, 299, 300, 320, 335, 369, 370] {
            rig.at(ms);
            rig.frame(&mut field);
            trace.push(format!("{ms}ms {}", field.text()));
        }

        insta::assert_snapshot!(trace.join("\n"), @r"
        0ms hell
        100ms hell
        299ms hell
        300ms hel
        320ms hel
        335ms he
        369ms he
        370ms h
        ");
    }

    #[test]
    fn repeat_interval_is_configurable() {
        let mut rig = Rig::new();
        let opts = rig.options().repeat_interval(Duration::from_millis(100));
        let mut field = rig.field(opts);
        field.set_text("hello");
        field.set_cursor(5);
        rig.input.press_key(Key::Backspace);

        rig.frame(&mut field);
        rig.at(300);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
        rig.at(399);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
        rig.at(400);
        rig.frame(&mut field);
        assert_eq!(field.text(), "he");
    }

    #[test]
    fn release_on_the_expiry_frame_does_not_repeat() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("hello");
        field.set_cursor(5);

        rig.input.press_key(Key::Backspace);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hell");

        rig.at(300);
        rig.input.release_key(Key::Backspace);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hell");
        assert!(field.session().is_idle());

        // a new press starts over with the long delay
        rig.at(500);
        rig.input.press_key(Key::Backspace);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
        rig.at(799);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
        rig.at(800);
        rig.frame(&mut field);
        assert_eq!(field.text(), "he");
    }

    #[test]
    fn slow_frames_fire_at_most_one_repeat() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("hello");
        field.set_cursor(5);
        rig.input.press_key(Key::Backspace);

        rig.frame(&mut field);
        rig.at(1000);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");

        rig.at(1034);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
        rig.at(1035);
        rig.frame(&mut field);
        assert_eq!(field.text(), "he");
    }

    #[test]
    fn first_held_command_in_poll_order_wins() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("abc");
        field.set_cursor(3);

        rig.input.press_key(Key::Backspace);
        rig.input.press_key(Key::Left);
        rig.frame(&mut field);
        assert_eq!(field.text(), "abc");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn typed_character_beats_held_key() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("abc");
        field.set_cursor(3);

        rig.input.press_key(Key::Backspace);
        rig.input.type_text("x");
        rig.frame(&mut field);
        assert_eq!(field.text(), "abcx");
        assert_eq!(field.cursor(), 4);

        // the key is still down, so the next frame acts on it
        rig.frame(&mut field);
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn navigation_keys_move_the_cursor() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("abcd");
        field.set_cursor(2);

        for (key, expected) in [
            (Key::Right, 3),
            (Key::Right, 4),
            (Key::Right, 4),
            (Key::Home, 0),
            (Key::Left, 0),
            (Key::End, 4),
        ] {
            rig.input.press_key(key);
            rig.frame(&mut field);
            rig.input.release_key(key);
            rig.frame(&mut field);
            assert_eq!(field.cursor(), expected, "{key:?}");
        }

        field.set_cursor(1);
        rig.input.press_key(Key::Delete);
        rig.frame(&mut field);
        assert_eq!(field.text(), "acd");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn click_moves_cursor_to_nearest_boundary() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("ab");
        field.set_cursor(2);

        rig.click(&mut field, 5, 10);
        assert_eq!(field.cursor(), 0);
        rig.click(&mut field, 6, 10);
        assert_eq!(field.cursor(), 1);
        rig.click(&mut field, 16, 10);
        assert_eq!(field.cursor(), 2);
        // exact tie between boundaries 1 and 2
        rig.click(&mut field, 15, 10);
        assert_eq!(field.cursor(), 1);
        rig.click(&mut field, 90, 10);
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn click_accounts_for_padding_and_scroll() {
        let mut rig = Rig::new();
        let opts = rig.options().padding(Insets::uniform(5));
        let mut field = rig.field(opts);
        field.set_text("abcdefghijklmnopqrst");
        field.set_cursor(20);
        rig.frame(&mut field);
        assert_eq!(field.scroll_offset(), -112);

        rig.click(&mut field, 95, 10);
        assert_eq!(field.cursor(), 20);

        // left of the content area: clamped to its edge, 112px into the text
        rig.click(&mut field, 0, 10);
        assert_eq!(field.cursor(), 11);
        assert_eq!(field.scroll_offset(), -110);
    }

    #[test]
    fn clicks_outside_or_without_input_are_ignored() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("ab");
        field.set_cursor(2);

        rig.click(&mut field, 150, 10);
        assert_eq!(field.cursor(), 2);
        rig.input.move_cursor(Point::new(5, 10));
        rig.input.click(MouseButton::Secondary);
        rig.frame(&mut field);
        assert_eq!(field.cursor(), 2);

        let opts = rig
            .options()
            .widget(WidgetOptions::new().input_enabled(false));
        let mut passive = rig.field(opts);
        passive.set_text("ab");
        passive.set_cursor(2);
        rig.click(&mut passive, 5, 10);
        assert_eq!(passive.cursor(), 2);
    }

    #[test]
    fn caret_right_edge_is_clamped_to_inner_edge() {
        let mut rig = Rig::new();
        let opts = rig.options().padding(Insets::uniform(5));
        let mut field = rig.field(opts);
        field.set_text("abcdefghijklmnopqrst");
        field.set_cursor(20);
        rig.frame(&mut field);

        let rect = field.widget().rect;
        let caret = field.caret();
        assert_eq!(caret.location().x + caret.width, rect.right() - 5);

        rig.input.press_key(Key::Home);
        rig.frame(&mut field);
        assert_eq!(field.cursor(), 0);
        assert_eq!(field.scroll_offset(), 0);
        assert_eq!(field.caret().location().x, 5);
    }

    #[test]
    fn external_text_change_clamps_cursor() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("hello");
        field.set_cursor(5);

        field.set_text("hi");
        assert_eq!(field.cursor(), 2);
        rig.frame(&mut field);
        assert_eq!(field.cursor(), 2);

        field.set_cursor(40);
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn disabled_field_ignores_input() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("hello");
        field.set_cursor(5);

        rig.input.press_key(Key::Backspace);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hell");

        field.set_disabled(true);
        rig.at(300);
        rig.input.type_text("x");
        rig.frame(&mut field);
        rig.click(&mut field, 5, 10);
        assert_eq!(field.text(), "hell");
        assert_eq!(field.cursor(), 4);
        assert!(field.session().is_idle());

        // re-enabling with the key still down counts as a new press
        field.set_disabled(false);
        rig.at(310);
        rig.frame(&mut field);
        assert_eq!(field.text(), "hel");
    }

    #[test]
    fn text_and_caret_use_palette() {
        let mut rig = Rig::new();
        let opts = rig
            .options()
            .padding(Insets::uniform(2))
            .color(TextInputColor {
                idle: RED,
                disabled: GRAY,
                caret: BLUE,
            });
        let mut field = TextInput::new(opts);
        field.set_location(Rect::new(10, 10, 100, 20));
        field.set_text("a");
        field.set_cursor(1);

        rig.frame(&mut field);
        assert_eq!(rig.screen.pixel(15, 15), Some(RED));
        assert_eq!(rig.screen.pixel(22, 15), Some(BLUE));
        assert_eq!(rig.screen.pixel(24, 15), Some(Color::TRANSPARENT));

        field.set_disabled(true);
        rig.frame(&mut field);
        assert_eq!(rig.screen.pixel(15, 15), Some(GRAY));
        assert_eq!(rig.screen.pixel(22, 15), Some(GRAY));
    }

    #[test]
    fn text_is_clipped_to_the_content_area() {
        let mut rig = Rig::new();
        let opts = rig
            .options()
            .padding(Insets::uniform(2))
            .color(TextInputColor {
                idle: RED,
                disabled: GRAY,
                caret: BLUE,
            });
        let mut field = TextInput::new(opts);
        field.set_location(Rect::new(10, 10, 100, 20));
        field.set_text("a".repeat(15));
        field.set_cursor(0);

        rig.frame(&mut field);
        assert_eq!(field.scroll_offset(), 0);
        assert_eq!(rig.screen.pixel(30, 15), Some(RED));
        assert_eq!(rig.screen.pixel(107, 15), Some(RED));
        assert_eq!(rig.screen.pixel(108, 15), Some(Color::TRANSPARENT));
        assert_eq!(rig.screen.pixel(130, 15), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rounded_mask_clips_corners() {
        let mut rig = Rig::new();
        let opts = rig
            .options()
            .padding(Insets::uniform(2))
            .mask(NineSlice::rounded(4, Color::WHITE))
            .color(TextInputColor {
                idle: RED,
                disabled: GRAY,
                caret: BLUE,
            });
        let mut field = TextInput::new(opts);
        field.set_location(Rect::new(10, 10, 100, 20));
        field.set_text("a".repeat(15));
        field.set_cursor(0);

        rig.frame(&mut field);
        assert_eq!(rig.screen.pixel(12, 12), Some(Color::TRANSPARENT));
        assert_eq!(rig.screen.pixel(20, 20), Some(RED));
        assert_eq!(rig.screen.pixel(60, 12), Some(RED));
    }

    #[test]
    fn background_switches_to_disabled_variant() {
        let mut rig = Rig::new();
        let opts = rig.options().image(TextInputImage {
            idle: NineSlice::from_color(Color::WHITE),
            disabled: Some(NineSlice::from_color(GRAY)),
        });
        let mut field = TextInput::new(opts);
        field.set_location(Rect::new(10, 10, 100, 20));

        rig.frame(&mut field);
        assert_eq!(rig.screen.pixel(10, 28), Some(Color::WHITE));
        assert_eq!(rig.screen.pixel(60, 25), Some(Color::WHITE));
        assert_eq!(rig.screen.pixel(110, 10), Some(Color::TRANSPARENT));

        field.set_disabled(true);
        rig.frame(&mut field);
        assert_eq!(rig.screen.pixel(10, 28), Some(GRAY));

        let opts = rig.options().image(TextInputImage {
            idle: NineSlice::from_color(Color::WHITE),
            disabled: None,
        });
        let mut plain = TextInput::new(opts);
        plain.set_location(Rect::new(10, 10, 100, 20));
        plain.set_disabled(true);
        rig.frame(&mut plain);
        assert_eq!(rig.screen.pixel(10, 28), Some(Color::WHITE));
    }

    #[test]
    fn editing_makes_the_caret_visible() {
        let mut rig = Rig::new();
        let mut field = rig.field(rig.options());
        field.set_text("ab");
        field.set_cursor(2);

        rig.frame(&mut field);
        assert!(field.caret().visible());
        rig.at(500);
        rig.frame(&mut field);
        assert!(!field.caret().visible());

        rig.input.press_key(Key::Right);
        rig.frame(&mut field);
        assert_eq!(field.cursor(), 2);
        assert!(field.caret().visible());
    }

    #[test]
    fn preferred_size_is_caret_height_plus_padding() {
        let rig = Rig::new();
        let opts = rig.options().padding(Insets {
            left: 1,
            right: 1,
            top: 3,
            bottom: 2,
        });
        let field = TextInput::new(opts);
        assert_eq!(field.preferred_size(), Size::new(50, 21));

        let opts = rig
            .options()
            .widget(WidgetOptions::new().min_size(80, 10));
        let field = TextInput::new(opts);
        assert_eq!(field.preferred_size(), Size::new(80, 16));
    }

    #[test]
    fn fill_layout_places_a_text_input() {
        let rig = Rig::new();
        let mut field = TextInput::new(rig.options());
        let layout = FillLayout::new(Insets::uniform(4));

        assert_eq!(layout.preferred_size(&[&field]), Size::new(58, 24));
        layout.layout(&mut [&mut field], Rect::new(0, 0, 200, 40));
        assert_eq!(field.widget().rect, Rect::new(4, 4, 192, 32));
    }

    #[test]
    fn deferred_draws_run_in_order() {
        let mut queue = DeferredQueue::new();
        let mut screen = PixelBuffer::new(2, 2);
        queue.push(|s: &mut PixelBuffer| s.blend(0, 0, RED, CompositeMode::Copy));
        queue.push(|s: &mut PixelBuffer| s.blend(0, 0, BLUE, CompositeMode::Copy));
        assert_eq!(queue.len(), 2);

        queue.flush(&mut screen);
        assert_eq!(screen.pixel(0, 0), Some(BLUE));
        assert!(queue.is_empty());
    }
}

//! Donut Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent};

    use donut_dash::audio::AudioManager;
    use donut_dash::i18n::{Language, Text, tr};
    use donut_dash::platform::now_ms;
    use donut_dash::prize::{GeminiClient, GeminiConfig, PrizeSource};
    use donut_dash::sim::{
        DonutConfig, DonutPatch, Feedback, PowerupKind, SessionEffect, SessionPhase, SpeedBonus,
    };
    use donut_dash::{Game, Settings};

    /// Everything the page needs: the game, its audio and the prize client
    struct Host {
        game: Game,
        audio: AudioManager,
        settings: Settings,
        prizes: Rc<GeminiClient>,
        // Language the static labels were last rendered in
        labels_lang: Option<Language>,
    }

    type Shared = Rc<RefCell<Host>>;

    /// Run a game intent, play its audio and spawn any prize fetches
    fn dispatch(host: &Shared, intent: impl FnOnce(&mut Game, f64) -> Vec<SessionEffect>) {
        let now = now_ms();
        let fetches = {
            let mut h = host.borrow_mut();
            let effects = intent(&mut h.game, now);
            perform(&mut h, effects)
        };
        for ticket in fetches {
            spawn_prize_fetch(host.clone(), ticket);
        }
    }

    /// Apply audio effects; return the prize tickets to fetch
    fn perform(h: &mut Host, effects: Vec<SessionEffect>) -> Vec<u32> {
        let mut fetches = Vec::new();
        for effect in &effects {
            match effect {
                SessionEffect::FetchPrize { ticket } => fetches.push(*ticket),
                other => h.audio.apply(other),
            }
        }
        fetches
    }

    fn spawn_prize_fetch(host: Shared, ticket: u32) {
        let client = host.borrow().prizes.clone();
        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Requesting prize (ticket {})", ticket);
            let prize = client.generate_prize().await;
            dispatch(&host, move |game, now| game.deliver_prize(ticket, prize, now));
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Donut Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let mut audio = AudioManager::new(seed);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let mut game = Game::new(seed);
        let now = now_ms();
        let effects = game.set_volume(settings.music_volume, now);
        game.set_language(settings.language, now);

        let mut host = Host {
            game,
            audio,
            settings,
            prizes: Rc::new(GeminiClient::new(GeminiConfig::from_env())),
            labels_lang: None,
        };
        perform(&mut host, effects);
        let host = Rc::new(RefCell::new(host));

        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(&document, host.clone());
        setup_selection_buttons(&document, host.clone());
        setup_powerup_buttons(&document, host.clone());
        setup_language_buttons(&document, host.clone());
        setup_volume_slider(&document, host.clone());
        setup_keyboard(host.clone());
        setup_auto_pause(host.clone());

        request_animation_frame(host);

        log::info!("Donut Dash running!");
    }

    /// Click handler on the element with `id`
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Every element matching `selector`
    fn elements(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn setup_buttons(document: &Document, host: Shared) {
        for id in ["start-btn", "restart-btn"] {
            let host = host.clone();
            on_click(document, id, move || {
                host.borrow().audio.resume();
                dispatch(&host, |game, now| game.start_game(now));
            });
        }
        {
            let host = host.clone();
            on_click(document, "serve-btn", move || {
                dispatch(&host, |game, now| game.serve(now))
            });
        }
        for id in ["pause-btn", "resume-btn"] {
            let host = host.clone();
            on_click(document, id, move || {
                dispatch(&host, |game, now| game.toggle_pause(now))
            });
        }
        on_click(document, "continue-btn", move || {
            dispatch(&host, |game, now| game.continue_after_prize(now))
        });
    }

    /// Option buttons carry `data-field` / `data-value`, e.g. `dough` / `MATCHA`
    fn setup_selection_buttons(document: &Document, host: Shared) {
        for el in elements(document, "[data-field]") {
            let (Some(field), Some(value)) =
                (el.get_attribute("data-field"), el.get_attribute("data-value"))
            else {
                continue;
            };
            let Some(patch) = DonutPatch::parse_pair(&field, &value) else {
                log::warn!("Unknown option {}={}", field, value);
                continue;
            };

            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&host, |game, now| game.update_selection(patch, now));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_powerup_buttons(document: &Document, host: Shared) {
        for el in elements(document, "[data-powerup]") {
            let Some(kind) = el
                .get_attribute("data-powerup")
                .and_then(|s| PowerupKind::from_str(&s))
            else {
                continue;
            };

            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&host, |game, now| game.activate_powerup(kind, now));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_language_buttons(document: &Document, host: Shared) {
        for el in elements(document, "[data-lang]") {
            let Some(lang) = el
                .get_attribute("data-lang")
                .and_then(|s| Language::from_code(&s))
            else {
                continue;
            };

            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&host, |game, now| game.set_language(lang, now));
                let mut h = host.borrow_mut();
                h.settings.language = lang;
                h.settings.save();
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_volume_slider(document: &Document, host: Shared) {
        let Some(slider) = document
            .get_element_by_id("volume-slider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        slider.set_value(&host.borrow().settings.music_volume.to_string());

        let slider_clone = slider.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Ok(volume) = slider_clone.value().parse::<f32>() else {
                return;
            };
            dispatch(&host, |game, now| game.set_volume(volume, now));
            let mut h = host.borrow_mut();
            h.settings.music_volume = h.game.state().music_volume;
            h.settings.save();
        });
        let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(host: Shared) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "Escape" | "p" | "P" => dispatch(&host, |game, now| game.toggle_pause(now)),
                "Enter" | " " => {
                    let phase = host.borrow().game.state().phase;
                    match phase {
                        SessionPhase::Idle | SessionPhase::GameOver => {
                            dispatch(&host, |game, now| game.start_game(now))
                        }
                        SessionPhase::Reveal => {
                            dispatch(&host, |game, now| game.continue_after_prize(now))
                        }
                        _ => dispatch(&host, |game, now| game.serve(now)),
                    }
                }
                "1" => dispatch(&host, |game, now| {
                    game.activate_powerup(PowerupKind::TimeFreeze, now)
                }),
                "2" => dispatch(&host, |game, now| {
                    game.activate_powerup(PowerupKind::DoublePoints, now)
                }),
                "3" => dispatch(&host, |game, now| {
                    game.activate_powerup(PowerupKind::InstantCook, now)
                }),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(host: Shared) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&host, "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&host, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn auto_pause(host: &Shared, reason: &str) {
        let pausable = {
            let h = host.borrow();
            let state = h.game.state();
            state.can_pause() && !state.is_paused
        };
        if pausable {
            dispatch(host, |game, now| game.toggle_pause(now));
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn request_animation_frame(host: Shared) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Shared) {
        dispatch(&host, |game, now| game.update(now));
        {
            let mut h = host.borrow_mut();
            h.audio.pump();
            update_hud(&mut h);
        }
        request_animation_frame(host);
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn describe(donut: &DonutConfig) -> String {
        format!(
            "{:?} · {:?} · {:?} · {:?} · {:?}",
            donut.shape, donut.dough, donut.topping, donut.sprinkles, donut.filling
        )
    }

    /// Update HUD elements in DOM
    fn update_hud(h: &mut Host) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let state = h.game.state();
        let lang = state.language;

        if h.labels_lang != Some(lang) {
            render_labels(&document, lang);
            h.labels_lang = Some(lang);
        }
        let state = h.game.state();

        set_text(&document, "hud-score", &state.score.to_string());
        set_text(&document, "hud-level", &state.level.to_string());
        set_text(&document, "hud-time", &state.time_left.to_string());
        set_text(&document, "hud-multiplier", &format!("x{}", state.multiplier));
        set_text(&document, "hud-streak", &state.streak.to_string());

        if let Some(order) = &state.current_order {
            set_text(&document, "order-summary", &describe(order));
        }
        set_text(&document, "donut-summary", &describe(&state.current_donut));

        let feedback = match state.last_feedback {
            Some(Feedback::Success) => tr(lang, Text::Success),
            Some(Feedback::Error) => tr(lang, Text::Error),
            None => "",
        };
        set_text(&document, "feedback", feedback);

        let bonus = match state.bonus_message {
            Some(SpeedBonus::Speed) => tr(lang, Text::SpeedBonus),
            Some(SpeedBonus::Fast) => tr(lang, Text::FastBonus),
            None => "",
        };
        set_text(&document, "bonus-message", bonus);

        for kind in PowerupKind::ALL {
            let id = format!("powerup-{}-count", kind.as_str());
            set_text(&document, &id, &state.inventory.count(kind).to_string());
        }

        let phase = state.phase;
        set_visible(&document, "start-screen", phase == SessionPhase::Idle);
        set_visible(&document, "game-screen", state.is_playing());
        set_visible(&document, "loading-screen", phase == SessionPhase::LoadingPrize);
        set_visible(&document, "reveal-screen", phase == SessionPhase::Reveal);
        set_visible(&document, "game-over", phase == SessionPhase::GameOver);
        set_visible(&document, "pause-menu", state.is_paused);

        if let Some(prize) = &state.prize {
            set_text(&document, "prize-name", &prize.name);
            set_text(&document, "prize-description", &prize.description);
            if let Some(img) = document.get_element_by_id("prize-image") {
                if img.get_attribute("src").as_deref() != Some(prize.image.as_str()) {
                    let _ = img.set_attribute("src", &prize.image);
                }
            }
        }

        if phase == SessionPhase::GameOver {
            set_text(&document, "final-score", &state.score.to_string());
            set_text(&document, "final-level", &state.level.to_string());
        }
    }

    /// Static labels and text direction for a language
    fn render_labels(document: &Document, lang: Language) {
        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("lang", lang.code());
            let _ = root.set_attribute("dir", if lang.is_rtl() { "rtl" } else { "ltr" });
        }

        let labels = [
            ("title", Text::Title),
            ("start-btn", Text::StartButton),
            ("order-label", Text::Order),
            ("serve-btn", Text::Serve),
            ("paused-label", Text::Paused),
            ("resume-btn", Text::Resume),
            ("out-of-time-label", Text::OutOfTime),
            ("restart-btn", Text::TryAgain),
            ("loading-label", Text::SummoningPrize),
            ("level-complete-label", Text::LevelComplete),
            ("continue-btn", Text::NextOrder),
        ];
        for (id, text) in labels {
            set_text(document, id, tr(lang, text));
        }
        log::info!("UI language: {}", lang.native_name());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Donut Dash (native) starting...");
    log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: plays a few perfect levels against the simulated clock
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use donut_dash::Game;
    use donut_dash::prize::{NoPrize, PrizeSource};
    use donut_dash::sim::{DonutPatch, SessionEffect, SessionPhase};
    use futures::executor::block_on;

    const FRAME_MS: f64 = 16.0;
    const LEVELS: u32 = 5;
    /// Simulated seconds spent "building" each donut
    const THINK_MS: f64 = 3_000.0;

    pub fn run(seed: u64) {
        let mut game = Game::new(seed);
        let mut now = 0.0;
        game.start_game(now);

        while game.state().level <= LEVELS && !game.state().is_game_over() {
            let Some(order) = game.state().current_order else {
                break;
            };
            now = advance(&mut game, now, now + THINK_MS);
            game.update_selection(DonutPatch::full(&order), now);
            game.serve(now);

            let state = game.state();
            log::info!(
                "Level {}: served {:?}, score {}, streak {}, x{}",
                state.level,
                order,
                state.score,
                state.streak,
                state.multiplier
            );

            // Wait for the prize request
            let mut ticket = None;
            while ticket.is_none() && game.state().phase == SessionPhase::LevelCleared {
                now += FRAME_MS;
                ticket = game.update(now).into_iter().find_map(|e| match e {
                    SessionEffect::FetchPrize { ticket } => Some(ticket),
                    _ => None,
                });
            }
            let Some(ticket) = ticket else { break };

            // Offline: the prize source never answers, so the fallback is shown
            let prize = block_on(NoPrize.generate_prize());
            game.deliver_prize(ticket, prize, now);
            if let Some(prize) = &game.state().prize {
                log::info!("Prize: {} - {}", prize.name, prize.description);
            }
            game.continue_after_prize(now);
        }

        let state = game.state();
        println!(
            "Seed {}: reached level {} with score {} ({:?})",
            seed, state.level, state.score, state.phase
        );
    }

    fn advance(game: &mut Game, from: f64, to: f64) -> f64 {
        let mut now = from;
        while now < to {
            now += FRAME_MS;
            game.update(now);
        }
        now
    }
}

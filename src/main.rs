//! Box Walker entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

    use box_walker::HostError;
    use box_walker::platform::FrameGate;
    use box_walker::renderer::SceneRenderState;
    use box_walker::scene::{CameraState, OrbitControls, Projection, Scene};
    use box_walker::settings::Settings;
    use box_walker::sim::{InputEvent, InputQueue, InputState, LocomotionController};
    use box_walker::stats::FrameStats;

    const CANVAS_ID: &str = "canvas";

    /// Viewer instance holding all state
    struct App {
        controller: LocomotionController,
        input: InputState,
        queue: InputQueue,
        scene: Scene,
        camera: CameraState,
        orbit: OrbitControls,
        projection: Projection,
        render_state: Option<SceneRenderState>,
        gate: FrameGate,
        stats: FrameStats,
        settings: Settings,
        /// Last pointer position while the left button is held
        drag: Option<(i32, i32)>,
    }

    impl App {
        fn new(settings: Settings, width: u32, height: u32) -> Self {
            let mut orbit = OrbitControls::default();
            orbit.enable_zoom = settings.enable_zoom;
            Self {
                controller: LocomotionController::new(),
                input: InputState::default(),
                queue: InputQueue::new(),
                scene: Scene::new(settings.canvas_width, settings.canvas_height),
                camera: CameraState::new(settings.camera_mode),
                orbit,
                projection: Projection::new(width, height),
                render_state: None,
                gate: FrameGate::default(),
                stats: FrameStats::new(),
                settings,
                drag: None,
            }
        }

        /// Run one fixed frame: snapshot input, step the creature, frame the camera
        fn update(&mut self) {
            let report = self.queue.drain_into(&mut self.input);
            for _ in 0..report.camera_toggles {
                self.camera.toggle();
            }
            if report.camera_toggles > 0 {
                self.settings.camera_mode = self.camera.mode;
                self.settings.save();
            }

            self.controller.update(&self.input);
            self.camera.update(&self.orbit, self.controller.pose());
        }

        /// Render the current frame
        fn render(&mut self) {
            let list = self
                .scene
                .draw_list(self.controller.pose(), self.controller.limbs());
            let view_proj = self.projection.matrix() * self.camera.view();

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&list, &view_proj, &self.scene.lighting) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if !self.settings.show_stats {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.stats.fps().to_string()));
            }
        }
    }

    pub async fn run() -> Result<(), HostError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Box Walker starting...");

        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let settings = Settings::load();

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| HostError::NoCanvas(CANVAS_ID.to_string()))?;

        // Fixed logical size, scaled for the device pixel ratio
        let dpr = window.device_pixel_ratio();
        let width = (settings.canvas_width as f64 * dpr) as u32;
        let height = (settings.canvas_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!(
                "width: {}px; height: {}px;",
                settings.canvas_width, settings.canvas_height
            ),
        );

        if let Some(el) = document.get_element_by_id("hud-fps") {
            let class = if settings.show_stats { "hud-item" } else { "hud-item hidden" };
            let _ = el.set_attribute("class", class);
        }

        let app = Rc::new(RefCell::new(App::new(settings, width, height)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SceneRenderState::new(surface, &adapter, width, height).await?;
        app.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&document, app.clone())?;
        setup_mouse(&window, &canvas, app.clone())?;
        setup_focus(&window, app.clone())?;

        // Start frame loop
        request_animation_frame(app);

        log::info!("Box Walker running!");
        Ok(())
    }

    /// One keydown and one keyup listener feed the input queue
    fn setup_keyboard(document: &web_sys::Document, app: Rc<RefCell<App>>) -> Result<(), HostError> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = InputEvent::from_key_down(&event.key()) {
                    // Arrow keys would otherwise scroll the page
                    if matches!(input, InputEvent::Key { .. }) {
                        event.prevent_default();
                    }
                    app.borrow_mut().queue.push(input);
                }
            });
            document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(|_| HostError::Listener("keydown"))?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = InputEvent::from_key_up(&event.key()) {
                    app.borrow_mut().queue.push(input);
                }
            });
            document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(|_| HostError::Listener("keyup"))?;
            closure.forget();
        }

        Ok(())
    }

    /// Orbit drag and wheel zoom
    fn setup_mouse(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) -> Result<(), HostError> {
        // Mouse down on the canvas starts a drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    app.borrow_mut().drag = Some((event.client_x(), event.client_y()));
                }
            });
            canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
                .map_err(|_| HostError::Listener("mousedown"))?;
            closure.forget();
        }

        // Move/up are tracked on the window so drags can leave the canvas
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if let Some((last_x, last_y)) = a.drag {
                    let (x, y) = (event.client_x(), event.client_y());
                    let sensitivity = a.settings.orbit_sensitivity;
                    a.orbit
                        .rotate((x - last_x) as f32, (y - last_y) as f32, sensitivity);
                    a.drag = Some((x, y));
                }
            });
            window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .map_err(|_| HostError::Listener("mousemove"))?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().drag = None;
            });
            window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
                .map_err(|_| HostError::Listener("mouseup"))?;
            closure.forget();
        }

        // Wheel zoom needs a non-passive listener to stop page scrolling
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let speed = a.settings.zoom_speed;
                a.orbit.zoom(event.delta_y() as f32, speed);
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            canvas
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "wheel",
                    closure.as_ref().unchecked_ref(),
                    &options,
                )
                .map_err(|_| HostError::Listener("wheel"))?;
            closure.forget();
        }

        Ok(())
    }

    /// Key-up events are lost while the window is unfocused
    fn setup_focus(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), HostError> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            a.queue.push(InputEvent::ReleaseAll);
            a.drag = None;
            a.gate.reset();
            log::info!("Window blurred, releasing keys");
        });
        window
            .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())
            .map_err(|_| HostError::Listener("blur"))?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Fixed 60 Hz: faster displays skip callbacks, nothing is scaled by dt
            if a.gate.should_step(time) {
                a.update();
                a.render();
                a.stats.record(time);
                a.update_hud();
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await.map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Box Walker (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning headless walk...");
    headless_walk();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the controller through a scripted key sequence and print each leg
#[cfg(not(target_arch = "wasm32"))]
fn headless_walk() {
    use box_walker::Settings;
    use box_walker::consts::FRAME_RATE_HZ;
    use box_walker::scene::Scene;
    use box_walker::sim::{InputEvent, InputQueue, InputState, Key, LocomotionController};

    let script: [(&str, &[Key]); 5] = [
        ("walk forward", &[Key::Forward]),
        ("curve right", &[Key::Forward, Key::TurnRight]),
        ("stand still", &[]),
        ("turn in place", &[Key::TurnLeft]),
        ("back up", &[Key::Backward]),
    ];
    let frames_per_leg = FRAME_RATE_HZ as usize;

    let settings = Settings::load();
    let scene = Scene::new(settings.canvas_width, settings.canvas_height);
    let mut controller = LocomotionController::new();
    let mut queue = InputQueue::new();
    let mut input = InputState::default();

    for (label, keys) in script {
        queue.push(InputEvent::ReleaseAll);
        for &key in keys {
            queue.push(InputEvent::Key { key, pressed: true });
        }

        for _ in 0..frames_per_leg {
            queue.drain_into(&mut input);
            controller.update(&input);
        }

        let pose = controller.pose();
        let instances = scene.draw_list(pose, controller.limbs()).len();
        println!(
            "  {:<14} pos=({:>6.2}, {:>6.2}) heading={:>5.0} tick={:>5.1} {:?} [{} instances]",
            label,
            pose.position.x,
            pose.position.y,
            pose.heading,
            pose.tick,
            pose.gait(),
            instances
        );
    }
    println!("✓ Headless walk finished");
}

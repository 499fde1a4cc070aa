use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::canvas::CairoCanvas;
use crate::gui::animator::{Animator, now};
use crate::gui::gestures;
use crate::gui::theme::ThemeColors;
use gtk::prelude::*;
use gtk4 as gtk;
use huewheel::{Brightness, ColorWheel, Easing, Hsb, Size};
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Seconds a reloaded brightness takes to fade in.
const RELOAD_FADE: f64 = 0.3;

pub struct AppModel {
    pub wheel: Rc<RefCell<ColorWheel>>,
    pub animator: Option<Animator>,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub status: String,
}

#[derive(Debug)]
pub enum AppMsg {
    Selected(Hsb),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn describe(color: Hsb) -> String {
    format!(
        "{}  H {:.0}°  S {:.0}%  B {:.0}%",
        color.to_hex(),
        color.hue * 360.0,
        color.saturation * 100.0,
        color.brightness * 100.0
    )
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        Option<PathBuf>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Hue Wheel"),
            set_default_width: model.config.window.width,
            set_default_height: model.config.window.height,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                },

                gtk::Label {
                    set_margin_top: 6,
                    set_margin_bottom: 8,
                    set_selectable: true,
                    #[watch]
                    set_label: &model.status,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        let mut wheel = ColorWheel::new(config.wheel, config.variant);
        wheel.set_brightness(Brightness::new(config.brightness));
        {
            let sender = sender.clone();
            wheel.on_select(move |color| sender.input(AppMsg::Selected(color)));
        }
        let wheel = Rc::new(RefCell::new(wheel));

        let model = AppModel {
            wheel: wheel.clone(),
            animator: None,
            status: format!("{} wheel, tap a swatch", config.variant),
            config,
            config_path,
        };

        let widgets = view_output!();
        let drawing_area = &widgets.drawing_area;

        {
            let area = drawing_area.downgrade();
            wheel.borrow_mut().on_redraw(move || {
                if let Some(area) = area.upgrade() {
                    area.queue_draw();
                }
            });
        }

        {
            let wheel = wheel.clone();
            drawing_area.set_draw_func(move |area, cr, width, height| {
                let colors = ThemeColors::from_context(&area.style_context());
                let mut wheel = wheel.borrow_mut();
                wheel.set_size(Size::new(width as f64, height as f64));
                wheel.set_highlight_color(colors.highlight);
                if let Err(e) = wheel.render(&mut CairoCanvas::new(cr)) {
                    log::error!("Drawing error: {}", e);
                }
            });
        }

        {
            let wheel = wheel.clone();
            drawing_area.connect_resize(move |_, width, height| {
                wheel
                    .borrow_mut()
                    .set_size(Size::new(width as f64, height as f64));
            });
        }

        let animator = Animator::new(drawing_area, &wheel);
        gestures::attach(
            drawing_area,
            &wheel,
            &animator,
            model.config.window.highlight,
        );
        let mut model = model;
        model.animator = Some(animator);

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Selected(color) => {
                log::info!("Selected {}", color.to_hex());
                self.status = describe(color);
            }
            AppMsg::ConfigReload => {
                let Some(path) = &self.config_path else {
                    return;
                };
                match config::load_config(path) {
                    Ok(new_config) => self.apply_config(new_config),
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
            }
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}

impl AppModel {
    fn apply_config(&mut self, new_config: Config) {
        {
            let mut wheel = self.wheel.borrow_mut();
            wheel.set_config(new_config.wheel);

            if new_config.brightness != self.config.brightness {
                wheel.animate_brightness(
                    Brightness::new(new_config.brightness),
                    RELOAD_FADE,
                    Easing::EaseInOut,
                    now(),
                );
            }
        }
        if let Some(animator) = &self.animator {
            animator.kick();
        }
        if new_config.variant != self.config.variant {
            log::warn!(
                "Wheel variant changed to {}, restart to apply",
                new_config.variant
            );
        }

        self.config = Config {
            variant: self.config.variant,
            ..new_config
        };
        log::info!("Configuration reloaded");
    }
}

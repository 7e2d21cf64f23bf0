//! System tray icon with state-based updates.
//!
//! The tray menu is the manual trigger surface: it starts captures, copies
//! the last link, and opens or reloads the settings file.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// Ids of the tray menu items, handed to the app loop.
#[derive(Debug, Clone)]
pub struct MenuIds {
    /// "Take Screenshot"
    pub take_screenshot: MenuId,
    /// "Capture All Monitors"
    pub capture_all: MenuId,
    /// "Copy Last Link"
    pub copy_last_link: MenuId,
    /// "Open Settings"
    pub open_settings: MenuId,
    /// "Reload Settings"
    pub reload_settings: MenuId,
    /// "Exit"
    pub exit: MenuId,
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: MenuIds,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let take_screenshot = MenuItem::new("Take Screenshot", true, None);
        let capture_all = MenuItem::new("Capture All Monitors", true, None);
        let copy_last_link = MenuItem::new("Copy Last Link", true, None);
        let open_settings = MenuItem::new("Open Settings", true, None);
        let reload_settings = MenuItem::new("Reload Settings", true, None);
        let exit = MenuItem::new("Exit", true, None);

        let menu_ids = MenuIds {
            take_screenshot: take_screenshot.id().clone(),
            capture_all: capture_all.id().clone(),
            copy_last_link: copy_last_link.id().clone(),
            open_settings: open_settings.id().clone(),
            reload_settings: reload_settings.id().clone(),
            exit: exit.id().clone(),
        };

        menu.append_items(&[
            &take_screenshot,
            &capture_all,
            &copy_last_link,
            &PredefinedMenuItem::separator(),
            &open_settings,
            &reload_settings,
            &PredefinedMenuItem::separator(),
            &exit,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let state = TrayIconState::Idle;
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon(state)?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu item ids.
    pub fn menu_ids(&self) -> &MenuIds {
        &self.menu_ids
    }

    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = render_icon(state);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Filled disc in the state colour on a transparent square.
pub(crate) fn render_icon(state: TrayIconState) -> RgbaImage {
    let [r, g, b] = state.color();
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            Rgba([r, g, b, 0xFF])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

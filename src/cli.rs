//! Line-command shell over a [`SolarDesigner`].
//!
//! One command per line, for scripted or interactive sessions:
//!
//! ```text
//! add                  add a panel at the next grid cell
//! delete <id>          delete a panel
//! reset                remove all panels
//! rate <value>         set the electricity rate
//! energy <kwh>         set the annual energy per panel
//! zoom <level>         change the map zoom
//! map on|off           show or hide the map
//! drag <id> <x> <y>    drag a panel so its top-left lands at (x, y)
//! click <x> <y>        click inside the panel area
//! dblclick <x> <y>     double-click inside the panel area
//! key delete           press Delete
//! search <address>     geocode an address and recentre the map
//! irradiance           fetch irradiance for the map center
//! stats                print energy and savings
//! render               print the render frame as JSON
//! svg                  print the layout as SVG
//! help                 list commands
//! quit                 end the session
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use parking_lot::Mutex;
use solarkit_core::{
    AppEvent, EventBus, EventCategory, EventFilter, LayoutError, StatsEvent, SubscriptionId,
};
use solarkit_designer::{
    format_number, CanvasPoint, InputEvent, InteractionOutcome, Key, MapAdapter, MapUpdate,
    SolarDesigner, Stats, ViewportMap,
};
use solarkit_settings::DesignerConfig;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    Delete(u64),
    Reset,
    Rate(f64),
    Energy(f64),
    Zoom(f64),
    Map(bool),
    Drag { id: u64, x: f64, y: f64 },
    Click(f64, f64),
    DoubleClick(f64, f64),
    KeyDelete,
    Search(String),
    Irradiance,
    Stats,
    Render,
    Svg,
    Help,
    Quit,
}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("add", []) => Command::Add,
            ("delete", [id]) => Command::Delete(parse_id(id)?),
            ("reset", []) => Command::Reset,
            ("rate", [value]) => Command::Rate(parse_number(value)?),
            ("energy", [value]) => Command::Energy(parse_number(value)?),
            ("zoom", [level]) => Command::Zoom(parse_number(level)?),
            ("map", ["on"]) => Command::Map(true),
            ("map", ["off"]) => Command::Map(false),
            ("drag", [id, x, y]) => Command::Drag {
                id: parse_id(id)?,
                x: parse_number(x)?,
                y: parse_number(y)?,
            },
            ("click", [x, y]) => Command::Click(parse_number(x)?, parse_number(y)?),
            ("dblclick", [x, y]) => Command::DoubleClick(parse_number(x)?, parse_number(y)?),
            ("key", ["delete"]) | ("key", ["backspace"]) => Command::KeyDelete,
            ("search", _) if !rest.is_empty() => Command::Search(rest.to_string()),
            ("irradiance", []) => Command::Irradiance,
            ("stats", []) => Command::Stats,
            ("render", []) => Command::Render,
            ("svg", []) => Command::Svg,
            ("help", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            _ => bail!("Unrecognized command: '{}' (try 'help')", line),
        };
        Ok(Some(command))
    }
}

fn parse_id(text: &str) -> anyhow::Result<u64> {
    text.parse()
        .with_context(|| format!("Invalid panel id '{}'", text))
}

fn parse_number(text: &str) -> anyhow::Result<f64> {
    text.parse()
        .with_context(|| format!("Invalid number '{}'", text))
}

/// Figures shown by `stats`, kept current by the designer's stats events.
#[derive(Debug, Default)]
struct StatsBoard {
    latest: Option<Stats>,
    rejected_rate: Option<(f64, f64)>,
}

impl StatsBoard {
    fn apply(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Stats(StatsEvent::Updated {
                panel_count,
                annual_energy,
                monthly_average,
                annual_savings,
                electricity_rate,
            }) => {
                self.latest = Some(Stats {
                    panel_count: *panel_count,
                    annual_energy: *annual_energy,
                    monthly_average: *monthly_average,
                    annual_savings: *annual_savings,
                    electricity_rate: *electricity_rate,
                });
            }
            AppEvent::Stats(StatsEvent::RateRejected { value, retained }) => {
                self.rejected_rate = Some((*value, *retained));
            }
            _ => {}
        }
    }
}

/// A designer plus the stats display fed from its event bus.
pub struct Session {
    designer: SolarDesigner,
    currency: String,
    board: Arc<Mutex<StatsBoard>>,
    subscription: SubscriptionId,
}

impl Session {
    pub fn new(designer: SolarDesigner) -> Self {
        let currency = designer.config().pricing.currency.clone();
        let board = Arc::new(Mutex::new(StatsBoard {
            latest: Some(designer.get_stats()),
            rejected_rate: None,
        }));

        let sink = board.clone();
        let subscription = designer.events().subscribe(
            EventFilter::Categories(vec![EventCategory::Stats]),
            move |event| sink.lock().apply(event),
        );

        Self {
            designer,
            currency,
            board,
            subscription,
        }
    }

    /// Builds the map view and designer a configuration describes.
    pub fn from_config(config: DesignerConfig) -> Self {
        let map: Arc<dyn MapAdapter> = Arc::new(ViewportMap::from_settings(&config.map));
        Self::new(SolarDesigner::new(config, Some(map), Arc::new(EventBus::new())))
    }

    pub fn designer(&self) -> &SolarDesigner {
        &self.designer
    }

    /// Runs one command and returns the text to print.
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        // apply zoom notifications queued since the last command
        self.designer.process_map_updates();

        let output = match command {
            Command::Add => {
                let id = self.designer.add_panel();
                format!("Added panel {}", id)
            }
            Command::Delete(id) => {
                if !self.designer.delete_panel(id) {
                    bail!(LayoutError::PanelNotFound { id });
                }
                format!("Deleted panel {}", id)
            }
            Command::Reset => {
                self.designer.reset_all();
                "Layout reset".to_string()
            }
            Command::Rate(rate) => {
                if !self.designer.set_electricity_rate(rate) {
                    match self.board.lock().rejected_rate.take() {
                        Some((value, retained)) => {
                            bail!("Rate {} rejected, keeping {}", value, retained)
                        }
                        None => bail!("Rate {} rejected", rate),
                    }
                }
                format!("Electricity rate set to {} {}/kWh", rate, self.currency)
            }
            Command::Energy(energy) => {
                if !self.designer.set_energy_per_panel(energy) {
                    bail!("Energy per panel must be a positive number");
                }
                format!("Energy per panel set to {} kWh", format_number(energy))
            }
            Command::Zoom(level) => self.zoom(level)?,
            Command::Map(visible) => {
                if !self.designer.set_map_visible(visible) {
                    bail!(no_map());
                }
                let (w, h) = self.designer.store().panel_size();
                format!("Map {} (panels {}x{} px)", if visible { "on" } else { "off" }, w, h)
            }
            Command::Drag { id, x, y } => self.drag(id, x, y)?,
            Command::Click(x, y) => {
                describe(self.designer.handle_input(InputEvent::Click(CanvasPoint::new(x, y))))
            }
            Command::DoubleClick(x, y) => describe(
                self.designer
                    .handle_input(InputEvent::DoubleClick(CanvasPoint::new(x, y))),
            ),
            Command::KeyDelete => {
                describe(self.designer.handle_input(InputEvent::KeyDown(Key::Delete)))
            }
            Command::Search(address) => self.search(&address).await?,
            Command::Irradiance => self.irradiance().await?,
            Command::Stats => self.stats(),
            Command::Render => serde_json::to_string_pretty(&self.designer.render())?,
            Command::Svg => {
                let (w, h) = self.designer.store().canvas_size();
                self.designer.render().to_svg(w, h)
            }
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(output)
    }

    fn zoom(&mut self, level: f64) -> anyhow::Result<String> {
        let map = self
            .designer
            .map()
            .cloned()
            .ok_or_else(no_map)?;
        map.move_to(map.current_center(), level);
        self.designer.process_map_updates();

        let (w, h) = self.designer.store().panel_size();
        Ok(match map.meters_per_pixel() {
            Some(mpp) => format!("Zoom {} ({:.4} m/px, panels {}x{} px)", level, mpp, w, h),
            None => format!("Zoom {} (map view inactive)", level),
        })
    }

    /// Replays a drag as pointer events grabbing the panel at its center.
    fn drag(&mut self, id: u64, x: f64, y: f64) -> anyhow::Result<String> {
        let panel = self
            .designer
            .store()
            .get(id)
            .cloned()
            .ok_or(LayoutError::PanelNotFound { id })?;
        let origin = self.designer.controller().area_origin();
        let grab = CanvasPoint::new(
            origin.x + panel.x + panel.width / 2.0,
            origin.y + panel.y + panel.height / 2.0,
        );
        let drop = CanvasPoint::new(
            origin.x + x + panel.width / 2.0,
            origin.y + y + panel.height / 2.0,
        );

        match self.designer.handle_input(InputEvent::PointerDown(grab)) {
            InteractionOutcome::DragStarted { id: grabbed } if grabbed == id => {}
            _ => {
                self.designer.handle_input(InputEvent::PointerUp);
                bail!("Panel {} is covered by another panel", id);
            }
        }
        self.designer.handle_input(InputEvent::PointerMove(drop));
        self.designer.handle_input(InputEvent::PointerUp);
        // the click a pointer-up produces, swallowed after a moving drag
        self.designer.handle_input(InputEvent::Click(drop));

        let moved = self
            .designer
            .store()
            .get(id)
            .ok_or_else(|| anyhow!("Panel {} vanished during drag", id))?;
        Ok(format!("Panel {} at ({}, {})", id, moved.x, moved.y))
    }

    async fn search(&mut self, address: &str) -> anyhow::Result<String> {
        if !self.designer.search_address(address) {
            bail!("Address search unavailable");
        }
        loop {
            match self.designer.next_map_update().await {
                Some(MapUpdate::Geocoded { result: Some(_), .. }) => break,
                Some(MapUpdate::Geocoded { result: None, .. }) => {
                    bail!("Geocode was not successful for '{}'", address)
                }
                Some(_) => continue,
                None => bail!("Map update channel closed"),
            }
        }
        // the designer follows a successful geocode with an irradiance lookup
        self.wait_for_irradiance().await;

        let label = self.designer.location_label().unwrap_or_default().to_string();
        Ok(format!("Location: {}\n{}", label, self.stats()))
    }

    async fn irradiance(&mut self) -> anyhow::Result<String> {
        if !self.designer.request_irradiance() {
            bail!("Irradiance lookup unavailable");
        }
        if self.wait_for_irradiance().await {
            Ok(format!(
                "Energy per panel: {} kWh",
                format_number(self.designer.energy_per_panel())
            ))
        } else {
            bail!("Irradiance data unavailable")
        }
    }

    async fn wait_for_irradiance(&mut self) -> bool {
        while let Some(update) = self.designer.next_map_update().await {
            if let MapUpdate::Irradiance(result) = update {
                return result.is_some();
            }
        }
        false
    }

    fn stats(&self) -> String {
        let stats = match self.board.lock().latest.clone() {
            Some(stats) => stats,
            None => self.designer.get_stats(),
        };
        format!(
            "Panels: {}\nAnnual energy: {} kWh\nMonthly average: {} kWh\nAnnual savings: {} {}\nRate: {} {}/kWh",
            stats.panel_count,
            format_number(stats.annual_energy),
            format_number(stats.monthly_average),
            format_number(stats.annual_savings),
            self.currency,
            stats.electricity_rate,
            self.currency
        )
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.designer.events().unsubscribe(self.subscription);
    }
}

fn no_map() -> LayoutError {
    LayoutError::MapUnavailable {
        reason: "no map collaborator".to_string(),
    }
}

fn describe(outcome: InteractionOutcome) -> String {
    match outcome {
        InteractionOutcome::SelectionChanged { id: Some(id) } => format!("Selected panel {}", id),
        InteractionOutcome::SelectionChanged { id: None } => "Selection cleared".to_string(),
        InteractionOutcome::Deleted { id } => format!("Deleted panel {}", id),
        InteractionOutcome::Moved { id, x, y } => format!("Panel {} at ({}, {})", id, x, y),
        InteractionOutcome::DragStarted { id } => format!("Dragging panel {}", id),
        InteractionOutcome::DragEnded { id, .. } => format!("Dropped panel {}", id),
        InteractionOutcome::None => "Nothing changed".to_string(),
    }
}

const HELP: &str = "\
add | delete <id> | reset
rate <value> | energy <kwh>
zoom <level> | map on|off | search <address> | irradiance
drag <id> <x> <y> | click <x> <y> | dblclick <x> <y> | key delete
stats | render | svg | help | quit";

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use solarkit_designer::{GeocodeResult, Irradiance, LatLng};
    use tempfile::TempDir;

    use super::*;

    fn grid_session() -> Session {
        Session::new(SolarDesigner::new(
            DesignerConfig::default(),
            None,
            Arc::new(EventBus::new()),
        ))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("add").unwrap(), Some(Command::Add));
        assert_eq!(Command::parse("  DELETE 3 ").unwrap(), Some(Command::Delete(3)));
        assert_eq!(Command::parse("rate 0.31").unwrap(), Some(Command::Rate(0.31)));
        assert_eq!(Command::parse("map off").unwrap(), Some(Command::Map(false)));
        assert_eq!(
            Command::parse("drag 1 200 300.5").unwrap(),
            Some(Command::Drag { id: 1, x: 200.0, y: 300.5 })
        );
        assert_eq!(
            Command::parse("search Puerta del Sol, Madrid").unwrap(),
            Some(Command::Search("Puerta del Sol, Madrid".to_string()))
        );
        assert_eq!(Command::parse("key backspace").unwrap(), Some(Command::KeyDelete));
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("delete").is_err());
        assert!(Command::parse("delete x").is_err());
        assert!(Command::parse("rate cheap").is_err());
        assert!(Command::parse("map maybe").is_err());
        assert!(Command::parse("search").is_err());
        assert!(Command::parse("fly").is_err());
    }

    #[tokio::test]
    async fn test_grid_session() {
        let mut session = grid_session();
        session.execute(Command::Add).await.unwrap();
        session.execute(Command::Add).await.unwrap();
        session.execute(Command::Add).await.unwrap();

        let stats = session.execute(Command::Stats).await.unwrap();
        assert!(stats.contains("Panels: 3"));
        assert!(stats.contains("Annual energy: 1,200 kWh"));
        assert!(stats.contains("Annual savings: 300 EUR"));

        assert!(session.execute(Command::Rate(-5.0)).await.is_err());
        assert!(session.execute(Command::Delete(9)).await.is_err());
        assert!(session.execute(Command::Zoom(19.0)).await.is_err());
        assert!(session.execute(Command::Map(true)).await.is_err());

        let out = session
            .execute(Command::Drag { id: 0, x: 400.0, y: 300.0 })
            .await
            .unwrap();
        assert_eq!(out, "Panel 0 at (400, 300)");

        let out = session.execute(Command::Click(450.0, 350.0)).await.unwrap();
        assert_eq!(out, "Selected panel 0");
        let out = session.execute(Command::KeyDelete).await.unwrap();
        assert_eq!(out, "Deleted panel 0");

        let json = session.execute(Command::Render).await.unwrap();
        assert!(json.contains("\"data_panel_id\": 1"));

        session.execute(Command::Reset).await.unwrap();
        let svg = session.execute(Command::Svg).await.unwrap();
        assert!(svg.contains("start designing"));
    }

    #[tokio::test]
    async fn test_map_session() {
        let map = ViewportMap::new(LatLng::new(40.4168, -3.7038), 20.0)
            .with_place(
                "Madrid",
                GeocodeResult {
                    location: LatLng::new(40.4168, -3.7038),
                    display_address: "Madrid, Spain".to_string(),
                },
            )
            .with_irradiance(Irradiance {
                annual_kwh_per_kwp: 1500.0,
                monthly_kwh_per_kwp: [125.0; 12],
            });
        let map: Arc<dyn MapAdapter> = Arc::new(map);
        let mut config = DesignerConfig::default();
        config.map.enabled = true;
        let mut session = Session::new(SolarDesigner::new(config, Some(map), Arc::new(EventBus::new())));

        session.execute(Command::Add).await.unwrap();
        let out = session.execute(Command::Zoom(22.0)).await.unwrap();
        assert!(out.contains("panels 35x56 px"), "{out}");

        let out = session.execute(Command::Search("Madrid".to_string())).await.unwrap();
        assert!(out.contains("Location: Madrid, Spain"));
        assert!(out.contains("Annual energy: 600 kWh"));
        assert_eq!(session.designer().store().panel_size(), (15.0, 24.0));

        assert!(session
            .execute(Command::Search("Atlantis".to_string()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_stats_display_follows_events() {
        let mut session = grid_session();
        assert_eq!(session.designer().events().subscriber_count(), 1);

        session.execute(Command::Add).await.unwrap();
        session.execute(Command::Add).await.unwrap();
        assert_eq!(
            session.board.lock().latest.as_ref().map(|s| s.panel_count),
            Some(2)
        );

        let err = session.execute(Command::Rate(-5.0)).await.unwrap_err();
        assert_eq!(err.to_string(), "Rate -5 rejected, keeping 0.25");
        assert!(session.board.lock().rejected_rate.is_none());

        session.execute(Command::Rate(0.5)).await.unwrap();
        let stats = session.execute(Command::Stats).await.unwrap();
        assert!(stats.contains("Annual savings: 400 EUR"), "{stats}");

        session.execute(Command::Energy(400.25)).await.unwrap();
        let stats = session.execute(Command::Stats).await.unwrap();
        assert!(stats.contains("Annual energy: 800.5 kWh"), "{stats}");
    }

    #[tokio::test]
    async fn test_default_config_resolves_search_and_irradiance() {
        let mut session = Session::from_config(DesignerConfig::default());
        session.execute(Command::Add).await.unwrap();

        let out = session
            .execute(Command::Search("Madrid".to_string()))
            .await
            .unwrap();
        assert!(out.contains("Location: Madrid, Spain"), "{out}");
        // 1710 kWh/kWp * 0.4 kWp
        assert!(out.contains("Annual energy: 684 kWh"), "{out}");

        let out = session.execute(Command::Irradiance).await.unwrap();
        assert_eq!(out, "Energy per panel: 684 kWh");
    }

    #[tokio::test]
    async fn test_session_from_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [pricing]
            currency = "GBP"

            [map]
            enabled = true
            latitude = 53.8
            longitude = -1.55

            [[map.places]]
            address = "Home"
            display_address = "12 Solar Way, Leeds"
            latitude = 53.8
            longitude = -1.55

            [map.irradiance]
            annual_kwh_per_kwp = 960.0
            "#,
        )
        .unwrap();

        let config = DesignerConfig::load_from_file(&path).unwrap();
        let mut session = Session::from_config(config);
        session.execute(Command::Add).await.unwrap();

        let out = session
            .execute(Command::Search("home".to_string()))
            .await
            .unwrap();
        assert!(out.contains("Location: 12 Solar Way, Leeds"), "{out}");
        assert!(out.contains("Annual energy: 384 kWh"), "{out}");
        assert!(out.contains("GBP"), "{out}");

        assert!(session
            .execute(Command::Search("Madrid".to_string()))
            .await
            .is_err());
    }
}

// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::time;
use iced::widget::{button, column, pick_list, row, scrollable, text, text_input, Column};
use iced::{Alignment, Color, Element, Font, Length, Subscription, Task, Theme};
use plotters_iced::ChartWidget;
use rfd::FileDialog;

use sensor_console::export::{self, LogBook};
use sensor_console::history::ReadingHistory;
use sensor_console::ports::{self, PortEntry};
use sensor_console::quality::Quality;
use sensor_console::session::BAUD_RATE;
use sensor_console::settings::{Appearance, Settings};
use sensor_console::{Category, ChannelSink, LogLine, PortSession};

use crate::chart::ReadingChart;

// only the tail is rendered; export sees everything the log book kept
const VISIBLE_LOG_LINES: usize = 500;

#[derive(Debug, Clone)]
pub enum Message {
    PortNameChanged(String),
    PortSelected(PortEntry),
    RefreshPorts,
    Connect,
    Disconnect,
    CommandChanged(String),
    Send,
    ChartCategorySelected(Category),
    ExportLog,
    Quit,
    Tick,
}

pub struct SensorConsole {
    session: PortSession,
    log_rx: Receiver<LogLine>,
    log: LogBook,

    history: ReadingHistory,
    connected_at: Instant,

    available_ports: Vec<PortEntry>,
    selected_port: Option<PortEntry>,
    port_name: String,
    command_input: String,

    appearance: Appearance,
    chart_category: Category,
    settings_path: PathBuf,
}

fn log_scroll_id() -> scrollable::Id {
    scrollable::Id::new("log")
}

impl SensorConsole {
    /// `settings.appearance` is fixed for the lifetime of the window.
    pub fn new(settings: Settings, settings_path: PathBuf) -> Self {
        let (tx, log_rx) = channel();
        let session = PortSession::new(Arc::new(ChannelSink::new(tx)));

        let available_ports = ports::scan();
        let selected_port = Self::find_port(&available_ports, &settings.port_name);

        Self {
            session,
            log_rx,
            log: LogBook::default(),
            history: ReadingHistory::default(),
            connected_at: Instant::now(),
            available_ports,
            selected_port,
            port_name: settings.port_name,
            command_input: String::new(),
            appearance: settings.appearance,
            chart_category: settings.chart_category,
            settings_path,
        }
    }

    pub fn title(&self) -> String {
        match self.session.port_name() {
            Some(port) => format!("STM32 Serial Communication ({port})"),
            None => "STM32 Serial Communication".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        match self.appearance {
            Appearance::Dark => Theme::Dark,
            Appearance::Light => Theme::Light,
        }
    }

    fn find_port(ports: &[PortEntry], name: &str) -> Option<PortEntry> {
        ports
            .iter()
            .find(|p| p.port_name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn save_settings(&self) {
        let settings = Settings {
            port_name: self.port_name.trim().to_string(),
            appearance: self.appearance,
            chart_category: self.chart_category,
        };
        if let Err(e) = settings.save_to(&self.settings_path) {
            log::warn!("settings save to {}: {e}", self.settings_path.display());
        }
    }

    fn append(&mut self, line: LogLine) {
        if let LogLine::Reading(reading) = &line {
            let elapsed = self.connected_at.elapsed().as_secs_f32();
            self.history.push(reading, elapsed);
        }
        self.log.push(line);
    }

    fn append_and_scroll(&mut self, line: LogLine) -> Task<Message> {
        self.append(line);
        scrollable::snap_to(log_scroll_id(), scrollable::RelativeOffset::END)
    }

    /// Move everything the poll worker has queued into the visible log.
    fn drain_serial(&mut self) -> bool {
        let mut any = false;
        while let Ok(line) = self.log_rx.try_recv() {
            self.append(line);
            any = true;
        }
        any
    }

    fn export_log(&self) -> std::io::Result<()> {
        let dir = Settings::log_dir();
        std::fs::create_dir_all(&dir)?;

        if let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_directory(&dir)
            .set_file_name(format!("sensor_log_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S")))
            .save_file()
        {
            export::export_csv(self.log.iter(), &path)?;
        }
        Ok(())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshPorts => {
                self.available_ports = ports::scan();
                self.selected_port = Self::find_port(&self.available_ports, self.port_name.trim());
            }

            Message::PortNameChanged(name) => {
                if self.session.is_connected() {
                    return Task::none();
                }
                self.selected_port = Self::find_port(&self.available_ports, name.trim());
                self.port_name = name;
            }

            Message::PortSelected(p) => {
                if self.session.is_connected() {
                    return Task::none();
                }
                self.port_name = p.port_name.clone();
                self.selected_port = Some(p);
                self.save_settings();
            }

            Message::Connect => {
                let port_name = self.port_name.trim().to_string();
                return match self.session.open(&port_name) {
                    Ok(()) => {
                        self.history.clear();
                        self.connected_at = Instant::now();
                        self.save_settings();
                        self.append_and_scroll(LogLine::Status(format!(
                            "Connected to {port_name} at {BAUD_RATE} baud."
                        )))
                    }
                    Err(e) => {
                        log::warn!("{e}");
                        self.append_and_scroll(LogLine::error(e))
                    }
                };
            }

            Message::Disconnect => {
                let was_open = self.session.close();
                self.drain_serial();
                if was_open {
                    return self.append_and_scroll(LogLine::status("Serial connection closed."));
                }
            }

            Message::CommandChanged(input) => {
                self.command_input = input;
            }

            Message::Send => {
                let line = self.session.send_input(&self.command_input);
                return self.append_and_scroll(line);
            }

            Message::ChartCategorySelected(category) => {
                self.chart_category = category;
                self.save_settings();
            }

            Message::ExportLog => {
                if let Err(e) = self.export_log() {
                    return self.append_and_scroll(LogLine::error(format!("CSV export failed: {e}")));
                }
            }

            Message::Quit => {
                self.session.close();
                self.save_settings();
                return iced::exit::<Message>();
            }

            Message::Tick => {
                if self.drain_serial() {
                    return scrollable::snap_to(log_scroll_id(), scrollable::RelativeOffset::END);
                }
            }
        }

        Task::none()
    }

    fn latest_panel(&self) -> Element<'_, Message> {
        let gray = Color::from_rgb8(153, 153, 153);

        let cells: Vec<Element<'_, Message>> = Category::ALL
            .into_iter()
            .map(|category| {
                let (value_text, color) = match self.history.latest(category) {
                    Some(v) => {
                        let color = match category.quality(v) {
                            Some(Quality::Good) => Color::from_rgb8(0, 170, 0),
                            Some(Quality::Fair) => Color::from_rgb8(200, 120, 0),
                            Some(Quality::Poor) => Color::from_rgb8(217, 0, 0),
                            None => gray,
                        };
                        let band = category.quality(v).map(|q| format!(" {q}")).unwrap_or_default();
                        (format!("{v} {}{band}", category.unit()), color)
                    }
                    None => ("---".to_string(), gray),
                };

                column![text(category.to_string()).size(14.0), text(value_text).size(22.0).color(color)]
                    .spacing(2)
                    .width(Length::FillPortion(1))
                    .into()
            })
            .collect();

        iced::widget::Row::with_children(cells).spacing(20).into()
    }

    pub fn view(&self) -> Element<'_, Message> {
        fn action_button<'a>(
            label: &'a str,
            enabled: bool,
            msg: Message,
        ) -> iced::widget::Button<'a, Message> {
            let mut b = button(label);
            if enabled {
                b = b.on_press(msg);
            }
            b
        }

        let connected = self.session.is_connected();

        let mut port_input =
            text_input("Enter COM Port (e.g., COM7)", &self.port_name).width(Length::Fixed(220.0));
        if !connected {
            port_input = port_input
                .on_input(Message::PortNameChanged)
                .on_submit(Message::Connect);
        }

        let port_picker: Element<'_, Message> = if connected {
            text(
                self.selected_port
                    .as_ref()
                    .map(|p| p.display.as_str())
                    .unwrap_or(""),
            )
            .into()
        } else {
            pick_list(
                self.available_ports.clone(),
                self.selected_port.clone(),
                Message::PortSelected,
            )
            .placeholder("Detected ports")
            .width(Length::Fixed(300.0))
            .into()
        };

        let mut command_input = text_input("Enter Command (START, RESET, EXIT)", &self.command_input)
            .on_input(Message::CommandChanged)
            .width(Length::Fixed(220.0));
        if connected {
            command_input = command_input.on_submit(Message::Send);
        }

        let controls = column![
            row![
                text("COM Port:"),
                port_input,
                port_picker,
                action_button("Connect", !connected, Message::Connect),
                action_button("Disconnect", connected, Message::Disconnect),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            row![
                text("Command:"),
                command_input,
                action_button("Send", connected, Message::Send),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        ]
        .spacing(12);

        let chart = ReadingChart {
            history: &self.history,
            category: self.chart_category,
        };
        let plot: Element<'_, Message> = ChartWidget::new(chart)
            .width(Length::Fill)
            .height(Length::Fixed(280.0))
            .into();

        let chart_header = row![
            text("Chart:"),
            pick_list(
                Category::ALL.to_vec(),
                Some(self.chart_category),
                Message::ChartCategorySelected,
            ),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let error_color = Color::from_rgb8(220, 60, 60);
        let lines: Vec<Element<'_, Message>> = self
            .log
            .tail(VISIBLE_LOG_LINES)
            .map(|record| {
                let t = text(record.to_string()).font(Font::MONOSPACE).size(14.0);
                match record.line {
                    LogLine::Error(_) => t.color(error_color).into(),
                    _ => t.into(),
                }
            })
            .collect();
        let log_view = scrollable(Column::with_children(lines).spacing(2).width(Length::Fill))
            .id(log_scroll_id())
            .height(Length::Fill)
            .width(Length::Fill);

        let footer = row![
            button("Export Log").on_press(Message::ExportLog),
            button("Quit").on_press(Message::Quit),
        ]
        .spacing(10);

        column![
            controls,
            self.latest_panel(),
            chart_header,
            plot,
            text("STM32 Responses:"),
            log_view,
            footer,
        ]
        .spacing(12)
        .padding(10)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let serial_sub = if self.session.is_connected() {
            time::every(Duration::from_millis(100)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let ports_sub = time::every(Duration::from_secs(2)).map(|_| Message::RefreshPorts);

        Subscription::batch(vec![serial_sub, ports_sub])
    }
}

//! Panel layouts. Each function builds the whole content of one window.

use iced::widget::{
    button, checkbox, column, container, horizontal_space, mouse_area, row, scrollable, text,
    text_editor, Column,
};
use iced::{alignment, window, Element, Length};

use crate::progress::{self, Entry};
use crate::prompts;
use crate::theme;
use crate::Message;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct MainView<'a> {
    pub window: window::Id,
    pub status: &'a str,
    pub auto_suggest: bool,
    pub activity: Vec<Entry>,
}

/// Draggable title row with a close button.
fn header<'a>(title: &'a str, size: u16, window: window::Id) -> Element<'a, Message> {
    let close = button(text("×").size(20))
        .on_press(Message::CloseWindow(window))
        .padding([0, 8])
        .style(theme::close);

    mouse_area(
        row![text(title).size(size), horizontal_space(), close]
            .align_y(alignment::Vertical::Center)
            .spacing(8),
    )
    .on_press(Message::DragWindow(window))
    .into()
}

fn spinner<'a>(frame: usize) -> Element<'a, Message> {
    container(
        column![
            text(SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]).size(32),
            text("Generating...").size(14),
        ]
        .spacing(10)
        .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(alignment::Horizontal::Center)
    .align_y(alignment::Vertical::Center)
    .into()
}

fn error_line<'a>(error: Option<&'a str>) -> Option<Element<'a, Message>> {
    error.map(|e| text(e).size(13).color(theme::DANGER).into())
}

pub fn main_panel(view: MainView<'_>) -> Element<'_, Message> {
    let auto_write = button(
        container(text("Auto Write").size(16))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(50.0))
    .padding(15)
    .on_press(Message::OpenAutoWrite)
    .style(theme::primary);

    let rephrase = button(
        container(text("Rephrase").size(16))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(50.0))
    .padding(15)
    .on_press(Message::OpenRephrase)
    .style(theme::rephrase);

    let complete = button(
        container(text("Complete").size(16))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(50.0))
    .padding(15)
    .on_press(Message::Complete)
    .style(theme::complete);

    let toggle = checkbox("Suggest as I type", view.auto_suggest)
        .on_toggle(Message::ToggleAutoSuggest)
        .size(16)
        .text_size(14);

    let status = container(text(view.status).size(14))
        .width(Length::Fill)
        .padding(10)
        .style(theme::field);

    let activity = view.activity.into_iter().fold(Column::new().spacing(2), |col, entry| {
        let line = text(prompts::preview(&entry.text, 56)).size(12);
        let line = if entry.kind == progress::Kind::Error {
            line.color(theme::DANGER)
        } else {
            line.color(theme::MUTED)
        };
        col.push(line)
    });

    container(
        column![
            header("Writing Assistant", 18, view.window),
            auto_write,
            row![rephrase, complete].spacing(10),
            toggle,
            status,
            activity,
        ]
        .spacing(15),
    )
    .padding(20)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(theme::panel)
    .into()
}

pub fn suggestions_panel(window: window::Id, items: &[String]) -> Element<'_, Message> {
    let list = items
        .iter()
        .enumerate()
        .fold(Column::new().spacing(4), |col, (index, item)| {
            col.push(
                button(text(item.as_str()).size(14))
                    .width(Length::Fill)
                    .padding(8)
                    .on_press(Message::UseSuggestion(index))
                    .style(theme::suggestion),
            )
        });

    container(
        column![
            header("Suggestions", 14, window),
            scrollable(list).height(Length::Fill),
        ]
        .spacing(6),
    )
    .padding(8)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(theme::popup)
    .into()
}

pub struct EditorView<'a> {
    pub window: window::Id,
    pub content: &'a text_editor::Content,
    pub loading: bool,
    pub frame: usize,
    pub error: Option<&'a str>,
}

pub fn rephrase_panel<'a>(view: EditorView<'a>, source: &'a str) -> Element<'a, Message> {
    let body: Element<'a, Message> = if view.loading {
        spinner(view.frame)
    } else {
        let mut form = column![
            text(prompts::preview(source, 48)).size(13).color(theme::MUTED),
            text_editor(view.content)
                .placeholder("How would you like to rephrase this?")
                .on_action(Message::RephraseEdited)
                .padding(8)
                .height(Length::Fixed(100.0)),
            button(
                container(text("Rephrase").size(14))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Center),
            )
            .width(Length::Fill)
            .padding(8)
            .on_press(Message::SubmitRephrase)
            .style(theme::primary),
        ]
        .spacing(8);

        if let Some(line) = error_line(view.error) {
            form = form.push(line);
        }
        form.into()
    };

    container(column![header("Rephrase Text", 14, view.window), body].spacing(8))
        .padding(12)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(theme::popup)
        .into()
}

pub fn auto_write_panel(view: EditorView<'_>) -> Element<'_, Message> {
    let body: Element<'_, Message> = if view.loading {
        spinner(view.frame)
    } else {
        let mut form = column![
            text_editor(view.content)
                .placeholder("Enter what you want to write about...")
                .on_action(Message::AutoWriteEdited)
                .padding(15)
                .height(Length::Fixed(150.0)),
            button(
                container(text("Generate").size(16))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fixed(50.0))
            .padding(15)
            .on_press(Message::SubmitAutoWrite)
            .style(theme::primary),
        ]
        .spacing(10);

        if let Some(line) = error_line(view.error) {
            form = form.push(line);
        }
        form.into()
    };

    container(column![header("Auto Write", 16, view.window), body].spacing(10))
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(theme::panel)
        .into()
}

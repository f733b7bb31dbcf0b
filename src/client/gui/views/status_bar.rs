use iced::widget::{Button, Container, Row, Space, Text};
use iced::{Alignment, Color, Element, Font, Length};

use crate::client::models::app_state::{ConnectionState, WorkflowController};
use crate::client::models::messages::Message;

const LED_GREEN: Color = Color::from_rgb(0.1, 0.8, 0.3);
const LED_RED: Color = Color::from_rgb(0.9, 0.15, 0.15);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);

const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

fn led<'a>(color: Color) -> Element<'a, Message> {
    Container::new(Space::new(Length::Fixed(12.0), Length::Fixed(12.0)))
        .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| {
            iced::widget::container::Appearance {
                background: Some(iced::Background::Color(color)),
                border: iced::Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                shadow: iced::Shadow {
                    offset: iced::Vector::new(0.0, 0.0),
                    blur_radius: 6.0,
                    color,
                },
                ..Default::default()
            }
        })))
        .into()
}

pub fn view(state: &WorkflowController) -> Element<'_, Message> {
    let connection = state.connection();
    if connection == ConnectionState::Checking {
        return Text::new(connection.label()).size(16).style(TEXT_SECONDARY).into();
    }

    let color = if connection == ConnectionState::Connected { LED_GREEN } else { LED_RED };
    let mut row = Row::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .push(led(color))
        .push(Text::new(connection.label()).font(BOLD_FONT).size(16).style(TEXT_PRIMARY));

    if state.show_retry() {
        row = row.push(Space::with_width(Length::Fixed(12.0))).push(
            Button::new(Text::new("Retry Connection").size(14))
                .style(iced::theme::Button::Secondary)
                .on_press(Message::RetryConnection)
                .padding([6, 12]),
        );
    }
    row.into()
}

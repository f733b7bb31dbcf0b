use iced::widget::{Column, Container, Space, Text};
use iced::{Color, Element, Font, Length};

use crate::client::models::messages::Message;
use crate::common::models::{AnalysisResult, ResultBlock};

const CARD_BG: Color = Color::from_rgb(0.18, 0.19, 0.36);
const ANSWER_BG: Color = Color::from_rgb(0.12, 0.13, 0.26);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_ERROR: Color = Color::from_rgb(1.0, 0.45, 0.45);

const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

fn boxed(background: Color, radius: f32) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| iced::widget::container::Appearance {
        background: Some(iced::Background::Color(background)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }))
}

fn answer_box<'a>(text: String) -> Element<'a, Message> {
    Container::new(Text::new(text).size(14))
        .padding(12)
        .width(Length::Fill)
        .style(boxed(ANSWER_BG, 8.0))
        .into()
}

fn block_view<'a>(block: ResultBlock) -> Element<'a, Message> {
    match block {
        ResultBlock::Response { index, prompt, answer, error } => {
            let mut card = Column::new()
                .spacing(8)
                .push(Text::new(format!("Prompt {}", index)).font(BOLD_FONT).size(16))
                .push(Text::new(format!("Prompt: {}", prompt)).size(14))
                .push(Text::new("Answer:").font(BOLD_FONT).size(14))
                .push(answer_box(answer));
            if let Some(err) = error {
                card = card.push(Text::new(format!("Error: {}", err)).size(13).style(TEXT_ERROR));
            }
            Container::new(card)
                .padding(16)
                .width(Length::Fill)
                .style(boxed(CARD_BG, 12.0))
                .into()
        }
        ResultBlock::MergedSummary(summary) => Column::new()
            .spacing(8)
            .push(Text::new("Merged Summary").font(BOLD_FONT).size(20))
            .push(answer_box(summary))
            .into(),
    }
}

pub fn view<'a>(analysis: Option<&AnalysisResult>) -> Element<'a, Message> {
    let Some(analysis) = analysis else {
        return Space::new(Length::Fill, Length::Fixed(0.0)).into();
    };

    analysis
        .blocks()
        .into_iter()
        .fold(
            Column::new()
                .spacing(16)
                .push(Text::new("AI Analysis Results").font(BOLD_FONT).size(22)),
            |col, block| col.push(block_view(block)),
        )
        .into()
}

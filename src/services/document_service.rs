// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DispatchRepository,
    models::dispatch::DispatchSlipData,
};

// Família de fonte esperada em FONTS_DIR (Roboto-Regular.ttf, Roboto-Bold.ttf, ...)
const FONT_FAMILY: &str = "Roboto";

/// Texto codificado no QR Code do romaneio.
pub fn slip_reference(job_id: i32, dispatch_id: i32) -> String {
    format!("TRACKOPZ:JOB:{}:DISPATCH:{}", job_id, dispatch_id)
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

#[derive(Clone)]
pub struct DocumentService {
    dispatch_repo: DispatchRepository,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(dispatch_repo: DispatchRepository, fonts_dir: String) -> Self {
        Self { dispatch_repo, fonts_dir }
    }

    /// PDF do romaneio de despacho de um job.
    pub async fn generate_dispatch_slip<'e, E>(&self, executor: E, job_id: i32) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // 1. Busca os dados (só existe romaneio para job despachado)
        let data = self
            .dispatch_repo
            .find_slip_data(executor, job_id)
            .await?
            .ok_or(AppError::ResourceNotFound("dispatch"))?;

        // 2. Renderiza
        let buffer = self.render_slip(&data)?;

        tracing::info!(job_id, dispatch_id = data.dispatch_id, bytes = buffer.len(), "dispatch slip rendered");
        Ok(buffer)
    }

    fn render_slip(&self, data: &DispatchSlipData) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, FONT_FAMILY, None)
            .map_err(|_| AppError::FontNotFound(format!("{}/{}-*.ttf", self.fonts_dir, FONT_FAMILY)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Dispatch Slip - Job #{}", data.job_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new("TRACKOPZ").styled(style::Style::new().bold().with_font_size(18)));
        doc.push(
            elements::Paragraph::new(format!("DISPATCH SLIP #{}", data.dispatch_id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Date: {}",
            data.dispatched_at.format("%Y-%m-%d %H:%M UTC")
        )));
        doc.push(elements::Break::new(1.5));

        // --- DADOS DO JOB ---
        let mut table = elements::TableLayout::new(vec![2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let operator = data.operator_username.as_deref().unwrap_or("Unassigned");
        let rows = [
            ("Job", format!("#{}", data.job_id)),
            ("Product", data.product_name.clone()),
            ("Machine", data.machine_name.clone()),
            ("Operator", operator.to_string()),
            ("Quantity", data.quantity.to_string()),
            ("Cost per unit", format!("{:.2}", data.cost_per_unit)),
        ];

        let style_bold = style::Style::new().bold();
        for (label, value) in rows {
            table
                .row()
                .element(elements::Paragraph::new(label).styled(style_bold))
                .element(elements::Paragraph::new(value))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- TOTAL ---
        let mut total_paragraph = elements::Paragraph::new(format!("TOTAL: {:.2}", data.cost));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Break::new(2));

        // --- QR CODE ---
        let code = QrCode::new(slip_reference(data.job_id, data.dispatch_id).as_bytes()).map_err(pdf_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(pdf_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_identifies_job_and_dispatch() {
        assert_eq!(slip_reference(42, 7), "TRACKOPZ:JOB:42:DISPATCH:7");
    }
}

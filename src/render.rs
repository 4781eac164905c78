//! The layout engine: one render pass from payload to PDF bytes.
//!
//! Draws absolute-position text, boxes, and lines on a single US Letter
//! page (612x792 pt). All boxes are fixed-size; text is never wrapped,
//! truncated, or clipped: overlong content overpaints its box. The one
//! content-dependent dimension is the totals box, which grows by one row
//! pitch when a discount line is present.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use time::OffsetDateTime;

use crate::error::RenderError;
use crate::format;
use crate::payload::{split_lines, DocumentPayload, Totals};
use crate::template::Template;

// ============================================================================
// Constants
// ============================================================================

/// US Letter in points (72 dpi user space).
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const MARGIN: f32 = 50.0;
const RIGHT_EDGE: f32 = PAGE_WIDTH - MARGIN;

/// Line pitch in the header and addressee blocks.
const LINE_PITCH: f32 = 18.0;
/// Row pitch in the item table.
const ROW_PITCH: f32 = 20.0;

/// Document-number box, top-right.
const NUMBER_BOX_WIDTH: f32 = 160.0;
const NUMBER_BOX_HEIGHT: f32 = 50.0;
const NUMBER_BOX_LEFT: f32 = RIGHT_EDGE - NUMBER_BOX_WIDTH;
const NUMBER_BOX_TOP: f32 = PAGE_HEIGHT - MARGIN;

/// Addressee boxes, side by side below the header area.
const ADDRESS_BOX_TOP: f32 = 668.0;
const ADDRESS_BOX_HEIGHT: f32 = 104.0;
const ADDRESS_BOX_GAP: f32 = 12.0;
const ADDRESS_BOX_WIDTH: f32 = (PAGE_WIDTH - 2.0 * MARGIN - ADDRESS_BOX_GAP) / 2.0;

/// Item table geometry. Column widths span the printable width.
const TABLE_HEADER_TOP: f32 = 544.0;
const TABLE_HEADER_HEIGHT: f32 = 20.0;
const COL_ITEM_X: f32 = MARGIN;
const COL_QTY_X: f32 = 160.0;
const COL_DESC_X: f32 = 210.0;
const COL_RATE_X: f32 = 412.0;
const COL_AMOUNT_X: f32 = 482.0;
const CELL_INSET: f32 = 4.0;

/// Totals box, anchored bottom-right, same width as the number box.
const TOTALS_BOX_BOTTOM: f32 = 80.0;

/// Font sizes in points.
const TITLE_FONT_SIZE: f32 = 20.0;
const COMPANY_FONT_SIZE: f32 = 14.0;
const NORMAL_FONT_SIZE: f32 = 10.0;
const SMALL_FONT_SIZE: f32 = 9.0;
const TOTAL_FONT_SIZE: f32 = 12.0;

/// Logo bounding box, left of the document-number box.
const LOGO_MAX_WIDTH: f32 = 70.0;
const LOGO_MAX_HEIGHT: f32 = 46.0;

// ============================================================================
// Render Pass
// ============================================================================

/// Render one payload to a single-page PDF.
///
/// Pure with respect to the payload: identical payloads produce
/// byte-identical output. Metadata dates are pinned and XMP/ICC payloads
/// disabled so no generation timestamp leaks into the bytes.
pub fn render(payload: &DocumentPayload) -> Result<Vec<u8>, RenderError> {
    let template = payload.kind.template();
    let totals = payload.totals();

    let (doc, page1, layer1) = PdfDocument::new(
        template.title,
        pt(PAGE_WIDTH),
        pt(PAGE_HEIGHT),
        "Layer 1",
    );
    let doc = doc
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }))
        .with_creation_date(OffsetDateTime::UNIX_EPOCH)
        .with_mod_date(OffsetDateTime::UNIX_EPOCH);

    let layer = doc.get_page(page1).get_layer(layer1);

    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    draw_header_block(&layer, &font_regular, &font_bold, payload);
    draw_contact_block(&layer, &font_regular, &font_bold, payload);
    draw_number_box(&layer, &font_regular, &font_bold, payload, template);
    draw_addressee_boxes(&layer, &font_regular, &font_bold, payload, template);
    draw_item_table(&layer, &font_regular, &font_bold, payload, template);
    draw_totals_box(&layer, &font_regular, &font_bold, &totals, template);

    if let Some(logo) = &payload.logo {
        embed_logo(&layer, logo);
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

// ============================================================================
// Header Blocks
// ============================================================================

/// Company name, address lines, phone, fax: top-left, descending at a
/// fixed line pitch.
fn draw_header_block(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    payload: &DocumentPayload,
) {
    let company = &payload.company;
    let mut y = PAGE_HEIGHT - MARGIN + 6.0;

    if let Some(name) = &company.name {
        layer.use_text(name, COMPANY_FONT_SIZE, pt(MARGIN), pt(y), font_bold);
    }
    y -= LINE_PITCH;

    for line in split_lines(company.address.as_deref().unwrap_or("")) {
        layer.use_text(line, NORMAL_FONT_SIZE, pt(MARGIN), pt(y), font_regular);
        y -= LINE_PITCH;
    }

    if let Some(phone) = &company.phone {
        layer.use_text(
            format!("Phone: {}", phone),
            NORMAL_FONT_SIZE,
            pt(MARGIN),
            pt(y),
            font_regular,
        );
        y -= LINE_PITCH;
    }

    if let Some(fax) = &company.fax {
        layer.use_text(
            format!("Fax: {}", fax),
            NORMAL_FONT_SIZE,
            pt(MARGIN),
            pt(y),
            font_regular,
        );
    }
}

/// Email and website label/value pairs, offset from a center column.
fn draw_contact_block(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    payload: &DocumentPayload,
) {
    let center_col = PAGE_WIDTH / 2.0 - 60.0;
    let value_col = center_col + 42.0;
    let company = &payload.company;

    if let Some(email) = &company.email {
        layer.use_text("Email:", SMALL_FONT_SIZE, pt(center_col), pt(748.0), font_bold);
        layer.use_text(email, SMALL_FONT_SIZE, pt(value_col), pt(748.0), font_regular);
    }
    if let Some(website) = &company.website {
        layer.use_text("Web:", SMALL_FONT_SIZE, pt(center_col), pt(730.0), font_bold);
        layer.use_text(website, SMALL_FONT_SIZE, pt(value_col), pt(730.0), font_regular);
    }
}

/// Document title plus the bordered date/number box, top-right. The box
/// is fixed-size; content that does not fit overpaints the border.
fn draw_number_box(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    payload: &DocumentPayload,
    template: &Template,
) {
    layer.use_text(
        template.title,
        TITLE_FONT_SIZE,
        pt(NUMBER_BOX_LEFT),
        pt(NUMBER_BOX_TOP + 22.0),
        font_bold,
    );

    draw_rect_outline(
        layer,
        NUMBER_BOX_LEFT,
        NUMBER_BOX_TOP - NUMBER_BOX_HEIGHT,
        NUMBER_BOX_WIDTH,
        NUMBER_BOX_HEIGHT,
    );

    let label_x = NUMBER_BOX_LEFT + 8.0;
    let value_x = NUMBER_BOX_LEFT + 72.0;

    layer.use_text("Date:", NORMAL_FONT_SIZE, pt(label_x), pt(NUMBER_BOX_TOP - 18.0), font_bold);
    layer.use_text(
        payload.display_date(),
        NORMAL_FONT_SIZE,
        pt(value_x),
        pt(NUMBER_BOX_TOP - 18.0),
        font_regular,
    );

    layer.use_text(
        template.number_label,
        NORMAL_FONT_SIZE,
        pt(label_x),
        pt(NUMBER_BOX_TOP - 38.0),
        font_bold,
    );
    layer.use_text(
        payload.resolved_number(),
        NORMAL_FONT_SIZE,
        pt(value_x),
        pt(NUMBER_BOX_TOP - 38.0),
        font_regular,
    );
}

// ============================================================================
// Addressee Boxes
// ============================================================================

/// Two equal-width bordered boxes side by side (one when the template
/// has no ship-to), each titled and filled from the newline split.
fn draw_addressee_boxes(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    payload: &DocumentPayload,
    template: &Template,
) {
    draw_addressee_box(
        layer,
        font_regular,
        font_bold,
        MARGIN,
        template.bill_to_title,
        &payload.bill_to_lines(),
    );

    if let Some(ship_to_title) = template.ship_to_title {
        draw_addressee_box(
            layer,
            font_regular,
            font_bold,
            MARGIN + ADDRESS_BOX_WIDTH + ADDRESS_BOX_GAP,
            ship_to_title,
            &payload.ship_to_lines(),
        );
    }
}

fn draw_addressee_box(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    x: f32,
    title: &str,
    lines: &[&str],
) {
    draw_rect_outline(
        layer,
        x,
        ADDRESS_BOX_TOP - ADDRESS_BOX_HEIGHT,
        ADDRESS_BOX_WIDTH,
        ADDRESS_BOX_HEIGHT,
    );

    layer.use_text(title, NORMAL_FONT_SIZE, pt(x + 6.0), pt(ADDRESS_BOX_TOP - 14.0), font_bold);
    draw_line(layer, x, ADDRESS_BOX_TOP - 20.0, x + ADDRESS_BOX_WIDTH, ADDRESS_BOX_TOP - 20.0);

    let mut y = ADDRESS_BOX_TOP - 36.0;
    for line in lines {
        layer.use_text(*line, NORMAL_FONT_SIZE, pt(x + 6.0), pt(y), font_regular);
        y -= LINE_PITCH;
    }
}

// ============================================================================
// Item Table
// ============================================================================

/// Shaded header row, separating rule, then one row per non-placeholder
/// item at a fixed pitch. Returns the number of rows drawn.
fn draw_item_table(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    payload: &DocumentPayload,
    template: &Template,
) -> u32 {
    let columns_x = [COL_ITEM_X, COL_QTY_X, COL_DESC_X, COL_RATE_X, COL_AMOUNT_X];

    fill_rect(
        layer,
        MARGIN,
        TABLE_HEADER_TOP - TABLE_HEADER_HEIGHT,
        PAGE_WIDTH - 2.0 * MARGIN,
        TABLE_HEADER_HEIGHT,
    );

    let header_y = TABLE_HEADER_TOP - 14.0;
    for (header, x) in template.columns.iter().zip(columns_x) {
        layer.use_text(*header, NORMAL_FONT_SIZE, pt(x + CELL_INSET), pt(header_y), font_bold);
    }

    let rule_y = TABLE_HEADER_TOP - TABLE_HEADER_HEIGHT;
    draw_line(layer, MARGIN, rule_y, RIGHT_EDGE, rule_y);

    let mut rows = 0;
    let mut y = rule_y - 14.0;
    for item in payload.items.iter().filter(|item| !item.is_placeholder()) {
        let quantity = if template.blank_zero_quantity {
            format::quantity(item.quantity)
        } else {
            format!("{}", item.quantity.unwrap_or(0.0))
        };

        layer.use_text(&item.label, NORMAL_FONT_SIZE, pt(COL_ITEM_X + CELL_INSET), pt(y), font_regular);
        layer.use_text(quantity, NORMAL_FONT_SIZE, pt(COL_QTY_X + CELL_INSET), pt(y), font_regular);
        layer.use_text(
            &item.description,
            NORMAL_FONT_SIZE,
            pt(COL_DESC_X + CELL_INSET),
            pt(y),
            font_regular,
        );
        layer.use_text(
            format::currency(item.unit_rate),
            NORMAL_FONT_SIZE,
            pt(COL_RATE_X + CELL_INSET),
            pt(y),
            font_regular,
        );
        layer.use_text(
            format::currency(Some(item.amount())),
            NORMAL_FONT_SIZE,
            pt(COL_AMOUNT_X + CELL_INSET),
            pt(y),
            font_regular,
        );

        y -= ROW_PITCH;
        rows += 1;
    }

    rows
}

// ============================================================================
// Totals Box
// ============================================================================

/// Bordered box anchored bottom-right: subtotal, discount when present,
/// tax when the template carries it, and a bold total line. The discount
/// line is the only thing that changes the box height.
fn draw_totals_box(
    layer: &PdfLayerReference,
    font_regular: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    totals: &Totals,
    template: &Template,
) {
    let show_discount = totals.discount != 0.0;
    let mut line_count = 2.0;
    if show_discount {
        line_count += 1.0;
    }
    if template.show_tax_line {
        line_count += 1.0;
    }
    let box_height = 24.0 + ROW_PITCH * line_count;
    let box_top = TOTALS_BOX_BOTTOM + box_height;

    draw_rect_outline(layer, NUMBER_BOX_LEFT, TOTALS_BOX_BOTTOM, NUMBER_BOX_WIDTH, box_height);

    let label_x = NUMBER_BOX_LEFT + 8.0;
    let value_x = NUMBER_BOX_LEFT + 88.0;
    let mut y = box_top - 18.0;

    layer.use_text("Subtotal", NORMAL_FONT_SIZE, pt(label_x), pt(y), font_regular);
    layer.use_text(
        format::currency(Some(totals.subtotal)),
        NORMAL_FONT_SIZE,
        pt(value_x),
        pt(y),
        font_regular,
    );
    y -= ROW_PITCH;

    if show_discount {
        layer.use_text("Discount", NORMAL_FONT_SIZE, pt(label_x), pt(y), font_regular);
        layer.use_text(
            format::currency(Some(totals.discount)),
            NORMAL_FONT_SIZE,
            pt(value_x),
            pt(y),
            font_regular,
        );
        y -= ROW_PITCH;
    }

    if template.show_tax_line {
        layer.use_text("Tax", NORMAL_FONT_SIZE, pt(label_x), pt(y), font_regular);
        layer.use_text(
            format::currency(Some(totals.tax)),
            NORMAL_FONT_SIZE,
            pt(value_x),
            pt(y),
            font_regular,
        );
        y -= ROW_PITCH;
    }

    draw_line(layer, NUMBER_BOX_LEFT, y + 12.0, RIGHT_EDGE, y + 12.0);
    layer.use_text("Total", TOTAL_FONT_SIZE, pt(label_x), pt(y - 2.0), font_bold);
    layer.use_text(
        format::currency(Some(totals.total)),
        TOTAL_FONT_SIZE,
        pt(value_x),
        pt(y - 2.0),
        font_bold,
    );
}

// ============================================================================
// Logo
// ============================================================================

/// Embed the letterhead logo left of the number box, scaled to fit its
/// bounding box preserving aspect ratio, composited against white.
fn embed_logo(layer: &PdfLayerReference, logo: &::image::DynamicImage) {
    let rgba = logo.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();

    let mut rgb = ::image::RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let ::image::Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
        rgb.put_pixel(x, y, ::image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let aspect = width_px as f32 / height_px as f32;
    let (width, height) = if LOGO_MAX_WIDTH / LOGO_MAX_HEIGHT > aspect {
        (LOGO_MAX_HEIGHT * aspect, LOGO_MAX_HEIGHT)
    } else {
        (LOGO_MAX_WIDTH, LOGO_MAX_WIDTH / aspect)
    };

    let x = NUMBER_BOX_LEFT - 10.0 - width;
    let y = NUMBER_BOX_TOP - height;

    let pdf_image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let width_mm = pt(width).0;
    let dpi = width_px as f32 / (width_mm / 25.4);
    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt(x)),
            translate_y: Some(pt(y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

// ============================================================================
// Drawing Utilities
// ============================================================================

/// Points to printpdf's millimeter coordinates.
fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.75);
    let line = Line {
        points: vec![
            (Point::new(pt(x1), pt(y1)), false),
            (Point::new(pt(x2), pt(y2)), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

fn draw_rect_outline(layer: &PdfLayerReference, x: f32, y: f32, width: f32, height: f32) {
    draw_line(layer, x, y, x + width, y);
    draw_line(layer, x + width, y, x + width, y + height);
    draw_line(layer, x + width, y + height, x, y + height);
    draw_line(layer, x, y + height, x, y);
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, width: f32, height: f32) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.85, 0.85, 0.85, None)));
    let polygon = Polygon {
        rings: vec![vec![
            (Point::new(pt(x), pt(y)), false),
            (Point::new(pt(x + width), pt(y)), false),
            (Point::new(pt(x + width), pt(y + height)), false),
            (Point::new(pt(x), pt(y + height)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    };
    layer.add_polygon(polygon);
    // Text is painted with the fill color; restore it.
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}

//! In-memory document model over `lopdf`
//!
//! A `PdfModel` is loaded fresh from bytes for every signing call, mutated
//! in memory only, and serialized back with [`PdfModel::save`]. It never
//! touches storage.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use inksign_types::PageSize;

use crate::error::PdfError;
use crate::raster::{self, RasterPixels};

/// Upper bound on Parent-chain walks; a deeper chain is treated as cyclic.
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// Reference to an image XObject embedded in the document, with its
/// natural pixel dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ImageHandle {
    object_id: ObjectId,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    /// Natural width/height ratio of the source raster.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

pub struct PdfModel {
    doc: Document,
}

impl PdfModel {
    pub fn load(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Page object ids in page order (0-based indexing from here on).
    fn page_ids(&self) -> Vec<ObjectId> {
        self.doc.get_pages().values().copied().collect()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId, PdfError> {
        self.page_ids()
            .get(index)
            .copied()
            .ok_or_else(|| PdfError::Operation(format!("page index {} out of range", index)))
    }

    /// Intrinsic point dimensions of a page, from its MediaBox (walking up
    /// the page tree when the entry is inherited).
    pub fn page_size(&self, index: usize) -> Result<PageSize, PdfError> {
        let page_id = self.page_id(index)?;
        let mut current = page_id;
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            let dict = self
                .doc
                .get_object(current)
                .and_then(|o| o.as_dict())
                .map_err(|e| PdfError::Operation(e.to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let media_box = match media_box {
                    Object::Reference(id) => self
                        .doc
                        .get_object(*id)
                        .map_err(|e| PdfError::Operation(e.to_string()))?,
                    other => other,
                };
                let rect = media_box
                    .as_array()
                    .map_err(|e| PdfError::Operation(e.to_string()))?;
                if rect.len() != 4 {
                    return Err(PdfError::Operation("MediaBox is not a 4-element array".into()));
                }
                let nums: Vec<f64> = rect.iter().filter_map(number).collect();
                if nums.len() != 4 {
                    return Err(PdfError::Operation("MediaBox contains non-numeric entries".into()));
                }
                return Ok(PageSize::new(nums[2] - nums[0], nums[3] - nums[1]));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => current = *parent,
                _ => return Err(PdfError::Operation("page has no MediaBox".into())),
            }
        }
        Err(PdfError::Operation("page tree Parent chain is cyclic".into()))
    }

    /// Decode an image payload (format sniffed from leading bytes) and
    /// embed it as an image XObject. PNG alpha goes into an SMask.
    pub fn embed_image(&mut self, bytes: &[u8]) -> Result<ImageHandle, PdfError> {
        let decoded = raster::decode(bytes)?;
        let (width, height) = (decoded.width, decoded.height);

        let object_id = match decoded.pixels {
            RasterPixels::Jpeg(data) => self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                data,
            )),
            RasterPixels::Rgba { rgb, alpha } => {
                let smask_id = self.doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width as i64,
                        "Height" => height as i64,
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    alpha,
                ));
                self.doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => width as i64,
                        "Height" => height as i64,
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => 8,
                        "SMask" => smask_id,
                    },
                    rgb,
                ))
            }
        };

        tracing::debug!("embedded {}x{} image xobject", width, height);
        Ok(ImageHandle {
            object_id,
            width,
            height,
        })
    }

    /// Paint an embedded image onto a page. `x`/`y` are the page-space
    /// bottom-left corner of the drawn rectangle.
    pub fn draw_image(
        &mut self,
        page_index: usize,
        image: &ImageHandle,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), PdfError> {
        let page_id = self.page_id(page_index)?;
        let name = self.register_xobject(page_id, image.object_id)?;

        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as f32).into(),
                    0.into(),
                    0.into(),
                    (height as f32).into(),
                    (x as f32).into(),
                    (y as f32).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ];
        self.append_content(page_id, operations)
    }

    /// Draw a single line of text with the built-in Helvetica, solid black
    /// fill. `x`/`y` position the text baseline in page space.
    pub fn draw_text(
        &mut self,
        page_index: usize,
        text: &str,
        x: f64,
        y: f64,
        font_size: f64,
    ) -> Result<(), PdfError> {
        let page_id = self.page_id(page_index)?;
        let font_name = self.register_helvetica(page_id)?;

        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font_name.into_bytes()),
                    (font_size as f32).into(),
                ],
            ),
            Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
            Operation::new("Td", vec![(x as f32).into(), (y as f32).into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ];
        self.append_content(page_id, operations)
    }

    /// Serialize the mutated model back to bytes.
    pub fn save(&mut self) -> Result<Vec<u8>, PdfError> {
        self.doc.compress();
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PdfError::Operation(format!("failed to serialize PDF: {}", e)))?;
        Ok(buffer)
    }

    /// Register an XObject under a fresh name in the page's resources and
    /// return that name.
    fn register_xobject(
        &mut self,
        page_id: ObjectId,
        xobject_id: ObjectId,
    ) -> Result<String, PdfError> {
        let resources = self.resources_dict_mut(page_id)?;
        if resources.get(b"XObject").and_then(|o| o.as_dict()).is_err() {
            resources.set("XObject", Object::Dictionary(Dictionary::new()));
        }
        let xobjects = match resources.get_mut(b"XObject") {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return Err(PdfError::Operation("page XObject entry is not a dictionary".into())),
        };

        let mut n = 0usize;
        let name = loop {
            let candidate = format!("Im{}", n);
            if !xobjects.has(candidate.as_bytes()) {
                break candidate;
            }
            n += 1;
        };
        xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
        Ok(name)
    }

    /// Ensure a standard Helvetica font resource exists on the page and
    /// return its resource name.
    fn register_helvetica(&mut self, page_id: ObjectId) -> Result<String, PdfError> {
        let resources = self.resources_dict_mut(page_id)?;
        if resources.get(b"Font").and_then(|o| o.as_dict()).is_err() {
            resources.set("Font", Object::Dictionary(Dictionary::new()));
        }
        let fonts = match resources.get_mut(b"Font") {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return Err(PdfError::Operation("page Font entry is not a dictionary".into())),
        };

        if !fonts.has(b"Helv") {
            fonts.set(
                "Helv",
                Object::Dictionary(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                }),
            );
        }
        Ok("Helv".to_string())
    }

    /// Mutable access to the resources dictionary that applies to a page.
    ///
    /// Resources may live inline on the page, behind a reference, or be
    /// inherited from an ancestor node; a page without any gets a fresh
    /// inline dictionary.
    fn resources_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary, PdfError> {
        enum Location {
            InlineOn(ObjectId),
            Referenced(ObjectId),
            Missing,
        }

        let location = {
            let mut current = page_id;
            let mut location = None;
            for _ in 0..MAX_PAGE_TREE_DEPTH {
                let dict = self
                    .doc
                    .get_object(current)
                    .and_then(|o| o.as_dict())
                    .map_err(|e| PdfError::Operation(e.to_string()))?;
                match dict.get(b"Resources") {
                    Ok(Object::Reference(id)) => {
                        location = Some(Location::Referenced(*id));
                        break;
                    }
                    Ok(Object::Dictionary(_)) => {
                        location = Some(Location::InlineOn(current));
                        break;
                    }
                    _ => {}
                }
                match dict.get(b"Parent") {
                    Ok(Object::Reference(parent)) => current = *parent,
                    _ => {
                        location = Some(Location::Missing);
                        break;
                    }
                }
            }
            location.ok_or_else(|| {
                PdfError::Operation("page tree Parent chain is cyclic".into())
            })?
        };

        let holder = match location {
            Location::Referenced(id) => {
                return self
                    .doc
                    .get_object_mut(id)
                    .and_then(|o| o.as_dict_mut())
                    .map_err(|e| PdfError::Operation(e.to_string()));
            }
            Location::InlineOn(id) => id,
            Location::Missing => {
                let page = self
                    .doc
                    .get_object_mut(page_id)
                    .and_then(|o| o.as_dict_mut())
                    .map_err(|e| PdfError::Operation(e.to_string()))?;
                page.set("Resources", Object::Dictionary(Dictionary::new()));
                page_id
            }
        };

        let dict = self
            .doc
            .get_object_mut(holder)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| PdfError::Operation(e.to_string()))?;
        match dict.get_mut(b"Resources") {
            Ok(Object::Dictionary(resources)) => Ok(resources),
            _ => Err(PdfError::Operation("page Resources entry is not a dictionary".into())),
        }
    }

    /// Append a new content stream to a page, preserving whatever streams
    /// are already there.
    fn append_content(
        &mut self,
        page_id: ObjectId,
        operations: Vec<Operation>,
    ) -> Result<(), PdfError> {
        let encoded = Content { operations }
            .encode()
            .map_err(|e| PdfError::Operation(format!("failed to encode content stream: {}", e)))?;
        let stream_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), encoded));

        let existing = {
            let dict = self
                .doc
                .get_object(page_id)
                .and_then(|o| o.as_dict())
                .map_err(|e| PdfError::Operation(e.to_string()))?;
            dict.get(b"Contents").ok().cloned()
        };

        let new_contents = match existing {
            None => Object::Reference(stream_id),
            Some(Object::Reference(id)) => {
                Object::Array(vec![Object::Reference(id), Object::Reference(stream_id)])
            }
            Some(Object::Array(mut refs)) => {
                refs.push(Object::Reference(stream_id));
                Object::Array(refs)
            }
            // Inline stream: move it behind a reference first.
            Some(stream @ Object::Stream(_)) => {
                let moved = self.doc.add_object(stream);
                Object::Array(vec![Object::Reference(moved), Object::Reference(stream_id)])
            }
            Some(_) => {
                return Err(PdfError::Operation("page Contents entry has unexpected type".into()))
            }
        };

        let page = self
            .doc
            .get_object_mut(page_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| PdfError::Operation(e.to_string()))?;
        page.set("Contents", new_contents);
        Ok(())
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(*v as f64),
        _ => None,
    }
}

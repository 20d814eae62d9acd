use crate::error::model_error::ModelError;
use crate::{ErrorLocation, WindowParams};

use std::panic::Location;

/// Builder for creating validated WindowParams instances.
#[derive(Debug, Default)]
pub struct WindowParamsBuilder {
    token: Option<u64>,
    x: i32,
    y: i32,
    width: Option<i32>,
    height: Option<i32>,
    flags: u32,
}

impl WindowParamsBuilder {
    pub fn with_token(mut self, token: u64) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Build the WindowParams with validation.
    #[track_caller]
    pub fn build(self) -> Result<WindowParams, ModelError> {
        let token = self.token.ok_or_else(|| ModelError::Validation {
            message: String::from("Window token is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if token == 0 {
            return Err(ModelError::Validation {
                message: String::from("Window token must be non-zero"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(ModelError::Validation {
                    message: String::from("Window size is required"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if width <= 0 || height <= 0 {
            return Err(ModelError::Validation {
                message: format!("Invalid window size: {width}x{height}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(WindowParams {
            token,
            x: self.x,
            y: self.y,
            width,
            height,
            flags: self.flags,
        })
    }
}

//! # Lazy Image
//!
//! `img[data-src]` 首次进入视口时把延迟地址写入 `src`，添加 `loaded`，
//! 随后停止观察（每张图片只触发一次）。

use std::rc::Rc;

use crate::lifecycle::ControllerResources;
use crate::platform::{ObserverHandle, ObserverOptions};
use crate::selectors;

/// 创建懒加载观察器，返回观察器句柄与图片数量
pub(crate) fn observe_all(res: &Rc<ControllerResources>) -> (Option<ObserverHandle>, usize) {
    let images = res.env().surface().query_all(&selectors::lazy_images());

    let handle = res.observe(ObserverOptions::default(), |res, handle, entries| {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let img = entry.target;
            {
                let mut surface = res.env().surface_mut();
                if let Some(src) = surface.data(img, selectors::DEFERRED_SRC_DATA) {
                    surface.set_attribute(img, "src", &src);
                }
                surface.add_class(img, selectors::LOADED_CLASS);
            }
            res.env().observers.unobserve(handle, img);
        }
    });

    if let Some(handle) = handle {
        for img in &images {
            res.env().observers.observe(handle, *img);
        }
    }
    (handle, images.len())
}

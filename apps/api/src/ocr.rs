//! OCR collaborator — text recognition over uploaded case documents.
//!
//! `OcrService` is the abstract seam; [`MockOcrService`] returns canned
//! recognition text with a simulated processing delay. A real OCR backend
//! swaps in without touching the handlers.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::files::FileMeta;

/// Recognition output: extracted text plus overall confidence (0.0 – 1.0).
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub text: String,
    pub confidence: f32,
}

#[async_trait]
pub trait OcrService: Send + Sync {
    async fn recognize(&self, file: &FileMeta) -> Result<OcrOutcome, AppError>;
}

/// Mock recognizer. Picks a canned document by file type so the UI has
/// realistic material to exercise.
pub struct MockOcrService {
    delay: Duration,
}

impl MockOcrService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl OcrService for MockOcrService {
    async fn recognize(&self, file: &FileMeta) -> Result<OcrOutcome, AppError> {
        // Simulated processing time, as a real OCR round trip is not instant.
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let text = if file.file_type.starts_with("image/") {
            MOCK_PHOTO_TEXT
        } else if file.file_name.contains("合同") || file.file_name.contains("条款") {
            MOCK_POLICY_CLAUSE_TEXT
        } else {
            MOCK_INCIDENT_REPORT_TEXT
        };

        Ok(OcrOutcome {
            text: text.trim().to_string(),
            confidence: 0.95,
        })
    }
}

const MOCK_INCIDENT_REPORT_TEXT: &str = r#"保险事故报告

出险时间：2024年6月7日 14:30
出险地点：上海市浦东新区张江高科技园区
事故性质：设备故障导致的财产损失

详细经过：
1. 当日下午14:30左右，园区内突然停电
2. 备用发电机启动失败，导致电梯系统断电
3. 电梯轿厢被困在5楼与6楼之间
4. 消防队到场后成功救出被困人员
5. 电梯控制系统主板烧毁，需要更换

损失情况：
- 电梯主控制板：12,500元
- 应急通讯系统：3,200元
- 停电期间业务损失：1,551.89元

总计损失：17,251.89元

报告人：张经理
联系电话：138****5678
报告时间：2024年6月7日 16:00"#;

const MOCK_PHOTO_TEXT: &str = r#"事故现场照片说明

图片显示：
- 电梯门打开状态，轿厢停在楼层中间位置
- 控制面板显示故障代码：E-07
- 电梯轿厢内应急照明正常工作
- 楼层显示器黑屏，无数字显示

可见损坏情况：
1. 主控制面板右侧有明显烧焦痕迹
2. 应急通话器指示灯不亮
3. 楼层按钮部分无响应

拍摄时间：2024年6月7日 15:45
拍摄位置：6楼电梯厅
天气状况：晴天，光线充足"#;

const MOCK_POLICY_CLAUSE_TEXT: &str = r#"保险合同条款（部分）

第三条 保险责任
保险人对下列原因造成保险标的损失负责赔偿：
(一) 火灾、爆炸
(二) 雷击、暴雨、洪水、台风、暴雪、冰雹、龙卷风、山崩、滑坡、泥石流
(三) 意外事故造成的设备损坏

第五条 责任免除
下列损失，保险人不负责赔偿：
(一) 投保人、被保险人的故意行为
(二) 自然磨损、腐蚀、变质
(三) 战争、军事行动、暴乱"#;

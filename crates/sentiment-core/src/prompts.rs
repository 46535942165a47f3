//! Prompt templates for provider-backed sentiment analysis

use crate::config::ResponseLanguage;
use crate::error::Result;
use minijinja::{Environment, context};

const TEMPLATE_NAME: &str = "news_sentiment.txt";

const SYSTEM_PROMPT_ZH: &str = "你是一个专业的金融分析师，擅长分析新闻对股票价格的影响。";

const SYSTEM_PROMPT_EN: &str =
    "You are a professional financial analyst who specializes in judging how news affects stock prices.";

const USER_TEMPLATE_ZH: &str = r#"请分析以下关于股票 {{ symbol }} 的新闻，并给出情绪分析结果。

新闻内容：
{% for item in news_items %}- {{ item }}
{% endfor %}
请从以下角度进行分析：
1. 对股票价格的潜在影响
2. 市场情绪倾向
3. 投资建议倾向

请以JSON格式返回结果，只包含以下字段：
- sentiment: "Positive", "Negative", 或 "Neutral"
- reason: 详细的分析原因
- confidence_score: 置信度分数（0.0-1.0）

分析要客观、专业，基于新闻内容的事实进行判断。"#;

const USER_TEMPLATE_EN: &str = r#"Analyze the following news about the stock {{ symbol }} and give a sentiment judgment.

News:
{% for item in news_items %}- {{ item }}
{% endfor %}
Consider:
1. The potential impact on the stock price
2. The market sentiment lean
3. The investment recommendation lean

Reply with a JSON object containing only these fields:
- sentiment: "Positive", "Negative", or "Neutral"
- reason: a detailed explanation
- confidence_score: a confidence score between 0.0 and 1.0

Be objective and professional, and base the judgment on the facts in the news."#;

/// System and user prompts for one response language
#[derive(Debug)]
pub struct NewsPrompt {
    env: Environment<'static>,
    language: ResponseLanguage,
}

impl NewsPrompt {
    /// Load the templates for `language`
    pub fn new(language: ResponseLanguage) -> Result<Self> {
        let mut env = Environment::new();
        let source = match language {
            ResponseLanguage::Chinese => USER_TEMPLATE_ZH,
            ResponseLanguage::English => USER_TEMPLATE_EN,
        };
        env.add_template(TEMPLATE_NAME, source)?;

        Ok(Self { env, language })
    }

    /// Language the prompts are written in
    pub fn language(&self) -> ResponseLanguage {
        self.language
    }

    /// Analyst persona sent as the system prompt
    pub fn system(&self) -> &'static str {
        match self.language {
            ResponseLanguage::Chinese => SYSTEM_PROMPT_ZH,
            ResponseLanguage::English => SYSTEM_PROMPT_EN,
        }
    }

    /// User prompt embedding the symbol and an itemized news list
    pub fn render_user(
        &self,
        symbol: &str,
        news_items: &[String],
    ) -> std::result::Result<String, minijinja::Error> {
        self.env
            .get_template(TEMPLATE_NAME)?
            .render(context! { symbol, news_items })
    }
}

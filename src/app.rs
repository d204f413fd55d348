use yew::prelude::*;

use crate::config::Config;
use crate::download::BrowserDownload;
use crate::qr_generator::EcLevel;
use crate::session::GeneratorSession;

pub struct Main {
    link: ComponentLink<Self>,
    props: Props,
    session: GeneratorSession,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub config: Config,
}

pub enum Msg {
    SetText(String),
    SetLevel(String),
    Generate,
    DownloadPng,
    DownloadSvg,
}

impl Component for Main {
    type Message = Msg;
    type Properties = Props;

    fn create(props: Self::Properties, link: ComponentLink<Self>) -> Self {
        Self {
            link,
            session: GeneratorSession::new(props.config.clone()),
            props,
        }
    }

    fn update(&mut self, msg: Self::Message) -> ShouldRender {
        match msg {
            Msg::SetText(text) => self.session.set_text(text),
            Msg::SetLevel(letter) => match EcLevel::from_letter(&letter) {
                Some(level) => self.session.set_selected_level(level),
                None => {
                    log::warn!("unknown error correction level {:?}", letter);
                    return false;
                }
            },
            // Failures are logged and kept in the session for display.
            Msg::Generate => {
                let _ = self.session.generate();
            }
            Msg::DownloadPng => {
                let _ = self.session.export_raster(&BrowserDownload);
            }
            Msg::DownloadSvg => {
                let _ = self.session.export_vector(&BrowserDownload);
            }
        }
        true
    }

    fn change(&mut self, props: Self::Properties) -> ShouldRender {
        if self.props == props {
            return false;
        }
        let text = self.session.text().to_owned();
        self.session = GeneratorSession::new(props.config.clone());
        self.session.set_text(text);
        self.props = props;
        true
    }

    fn view(&self) -> Html {
        let has_code = self.session.current().is_some();

        html! {
            <div class="generator">
                <div class="input">
                    <label for="data">{ "Data / URL" }</label>
                    <input
                        id="data"
                        type="text"
                        placeholder="Enter data or URL"
                        value=self.session.text().to_owned()
                        oninput=self.link.callback(|e: InputData| Msg::SetText(e.value))
                    />
                    <label for="level">{ "Error Correction Level" }</label>
                    <select id="level" onchange=self.link.callback(|e: ChangeData| match e {
                        ChangeData::Select(select) => Msg::SetLevel(select.value()),
                        ChangeData::Value(value) => Msg::SetLevel(value),
                        ChangeData::Files(_) => Msg::SetLevel(String::new()),
                    })>
                        { for EcLevel::ALL.iter().map(|level| self.view_level_option(*level)) }
                    </select>
                </div>
                <div class="output">
                    <button onclick=self.link.callback(|_| Msg::Generate)>{ "Generate QR Code" }</button>
                    <h2>{ "QR Code Preview" }</h2>
                    <div class="preview">
                        { self.view_preview() }
                    </div>
                    {
                        match self.session.last_error() {
                            Some(message) => html! { <p class="error">{ message }</p> },
                            None => html! {},
                        }
                    }
                    <div class="downloads">
                        <button onclick=self.link.callback(|_| Msg::DownloadPng) disabled={ !has_code }>{ "Download PNG" }</button>
                        <button onclick=self.link.callback(|_| Msg::DownloadSvg) disabled={ !has_code }>{ "Download SVG" }</button>
                    </div>
                </div>
            </div>
        }
    }
}

impl Main {
    fn view_level_option(&self, level: EcLevel) -> Html {
        html! {
            <option value=level.letter() selected={ level == self.session.selected_level() }>
                { level.letter() }
            </option>
        }
    }

    fn view_preview(&self) -> Html {
        match self.session.current() {
            Some(raster) => html! {
                <img alt="QR Code" src=raster.data_url().to_owned() width=raster.width().to_string() height=raster.width().to_string() />
            },
            None => html! {},
        }
    }
}
